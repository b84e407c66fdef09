use crate::{
    AccountInfo, AccountKeys, AdapterConfig, EventKind, ListenerId, NetworkInfo,
    PendingTransaction, ProviderError, ReadyState, Session, SignMessagePayload,
    SignMessageResponse, TransactionOptions, TransactionPayload, WalletError, WalletEvent,
    driver::{Discovery, Feature, Locator, WalletDriver},
    events::EventEmitter,
    probe::{self, BrowserTimer, ProbeOutcome, Timer},
};
use futures::{
    channel::mpsc,
    future::{self, AbortHandle, Abortable, Either, LocalBoxFuture},
};
use std::{
    cell::{Cell, RefCell},
    fmt,
    pin::pin,
    rc::Rc,
};
use tracing::{debug, error, trace, warn};

#[cfg(test)]
mod tests;

/// Uniform connect/sign/disconnect surface over one wallet.
///
/// The adapter starts in [`ReadyState::NotDetected`] (or
/// [`ReadyState::Unsupported`] if the host cannot run the wallet) and becomes
/// [`ReadyState::Installed`] once [`WalletAdapter::detect`] found the
/// provider. Cloning the adapter gives another handle on the same wallet
/// state.
pub struct WalletAdapter<L: Locator> {
    inner: Rc<Inner<L>>,
}

struct Inner<L: Locator> {
    locator: L,
    config: AdapterConfig,
    timer: Rc<dyn Timer>,
    driver: RefCell<Option<L::Driver>>,
    ready_state: Cell<ReadyState>,
    detecting: Cell<bool>,
    /// outstanding [`WalletAdapter::detection`] futures
    detections: RefCell<Vec<(u64, AbortHandle)>>,
    next_detection: Cell<u64>,
    connecting: Cell<bool>,
    session: RefCell<Option<Session>>,
    network: RefCell<NetworkInfo>,
    account_subscribed: Cell<bool>,
    network_subscribed: Cell<bool>,
    events: EventEmitter,
}

/// Lowers the flag when dropped, whichever way the guarded operation ended.
struct FlagGuard<'a>(&'a Cell<bool>);

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Forgets a detection once its future completed or was dropped.
struct DetectionGuard<L: Locator> {
    adapter: WalletAdapter<L>,
    id: u64,
}

impl<L: Locator> Drop for DetectionGuard<L> {
    fn drop(&mut self) {
        self.adapter
            .inner
            .detections
            .borrow_mut()
            .retain(|(id, _)| *id != self.id);
    }
}

impl<L: Locator> Clone for WalletAdapter<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<L: Locator> fmt::Debug for WalletAdapter<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletAdapter")
            .field("name", &self.name())
            .field("ready_state", &self.ready_state())
            .field("connecting", &self.connecting())
            .field("connected", &self.connected())
            .finish_non_exhaustive()
    }
}

impl<L: Locator> WalletAdapter<L> {
    /// create the adapter with the default [`AdapterConfig`]
    pub fn new(locator: L) -> Self {
        Self::with_config(locator, AdapterConfig::default())
    }

    /// create the adapter, delays are measured with the browser's timers
    pub fn with_config(locator: L, config: AdapterConfig) -> Self {
        Self::with_timer(locator, config, BrowserTimer)
    }

    /// create the adapter with a custom source of delays (used by the probe
    /// and the connect deadline)
    pub fn with_timer(locator: L, config: AdapterConfig, timer: impl Timer + 'static) -> Self {
        let ready_state = if locator.is_supported() {
            ReadyState::NotDetected
        } else {
            ReadyState::Unsupported
        };
        debug!(wallet = locator.name(), %ready_state, "wallet adapter created");

        Self {
            inner: Rc::new(Inner {
                locator,
                config,
                timer: Rc::new(timer),
                driver: RefCell::new(None),
                ready_state: Cell::new(ready_state),
                detecting: Cell::new(false),
                detections: RefCell::new(Vec::new()),
                next_detection: Cell::new(0),
                connecting: Cell::new(false),
                session: RefCell::new(None),
                network: RefCell::new(NetworkInfo::default()),
                account_subscribed: Cell::new(false),
                network_subscribed: Cell::new(false),
                events: EventEmitter::default(),
            }),
        }
    }

    /// the wallet display name, `"OKX Wallet"` for example
    pub fn name(&self) -> &str {
        self.inner.locator.name()
    }

    /// link to install the wallet or learn about it
    pub fn url(&self) -> String {
        self.inner.locator.url()
    }

    /// image (URL or data URI) to display the wallet with
    pub fn icon(&self) -> &str {
        self.inner.locator.icon()
    }

    /// the settings the adapter was created with
    pub fn config(&self) -> &AdapterConfig {
        &self.inner.config
    }

    /// whether the wallet can be connected to, see [`WalletAdapter::detect`]
    pub fn ready_state(&self) -> ReadyState {
        self.inner.ready_state.get()
    }

    /// `true` while a [`WalletAdapter::connect`] is in progress
    pub fn connecting(&self) -> bool {
        self.inner.connecting.get()
    }

    /// `true` once an account is connected
    pub fn connected(&self) -> bool {
        self.inner
            .session
            .borrow()
            .as_ref()
            .is_some_and(|session| session.is_connected)
    }

    /// the connected account, every field is `None` while disconnected
    pub fn public_account(&self) -> AccountKeys {
        self.inner
            .session
            .borrow()
            .as_ref()
            .map(AccountKeys::from)
            .unwrap_or_default()
    }

    /// the network the wallet reported on connection or on the last change
    pub fn network(&self) -> NetworkInfo {
        self.inner.network.borrow().clone()
    }

    /// call `listener` for every event of the given `kind`
    pub fn on(&self, kind: EventKind, listener: impl Fn(&WalletEvent) + 'static) -> ListenerId {
        self.inner.events.on(Some(kind), Rc::new(listener))
    }

    /// call `listener` for every event
    pub fn on_all(&self, listener: impl Fn(&WalletEvent) + 'static) -> ListenerId {
        self.inner.events.on(None, Rc::new(listener))
    }

    /// remove a listener, returns `false` if it was already removed
    pub fn off(&self, id: ListenerId) -> bool {
        self.inner.events.off(id)
    }

    /// receive every event from now on. The stream ends when the adapter is
    /// dropped.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<WalletEvent> {
        self.inner.events.subscribe()
    }

    /// Look for the wallet provider in the host environment.
    ///
    /// Injected wallets are polled for, following the [`ProbeConfig`] of the
    /// adapter; wallets living in an embedding application are reached with
    /// a handshake. On success the ready state becomes
    /// [`ReadyState::Installed`] and a [`WalletEvent::ReadyStateChange`] is
    /// emitted.
    ///
    /// Running out of attempts is not an error: the state stays
    /// [`ReadyState::NotDetected`] and `detect` may be called again later
    /// (when the page regains focus for example). Does nothing if the wallet
    /// was already detected, is unsupported or if a detection is running.
    ///
    /// [`ProbeConfig`]: crate::ProbeConfig
    pub async fn detect(&self) -> ReadyState {
        let inner = &self.inner;
        if inner.ready_state.get() != ReadyState::NotDetected || inner.detecting.replace(true) {
            return inner.ready_state.get();
        }
        let _detecting = FlagGuard(&inner.detecting);
        let wallet = inner.locator.name();

        match inner.locator.discovery(inner.config.probe) {
            Discovery::Poll(config) => {
                let outcome = probe::poll(inner.timer.as_ref(), &config, || {
                    match inner.locator.locate() {
                        Some(driver) => {
                            *inner.driver.borrow_mut() = Some(driver);
                            true
                        }
                        None => false,
                    }
                })
                .await;

                match outcome {
                    ProbeOutcome::Detected { polls } => {
                        debug!(wallet, polls, "wallet provider detected");
                        inner.set_ready_state(ReadyState::Installed);
                    }
                    ProbeOutcome::Exhausted { polls } => {
                        debug!(wallet, polls, "wallet provider not detected");
                    }
                }
            }
            Discovery::Handshake => match inner.locator.handshake().await {
                Ok(driver) => {
                    debug!(wallet, "wallet handshake completed");
                    *inner.driver.borrow_mut() = Some(driver);
                    inner.set_ready_state(ReadyState::Installed);
                }
                Err(error) => {
                    error!(wallet, %error, "wallet handshake failed");
                    inner.set_ready_state(ReadyState::Unsupported);
                }
            },
        }

        inner.ready_state.get()
    }

    /// [`WalletAdapter::detect`] as a future that [`WalletAdapter::cancel_detection`]
    /// can abort. It resolves to `Err(Aborted)` if cancelled.
    ///
    /// Only one detection probes at a time: a detection started while
    /// another one runs resolves at once with the current state.
    pub fn detection(&self) -> Abortable<LocalBoxFuture<'static, ReadyState>> {
        let (handle, registration) = AbortHandle::new_pair();
        let id = self.inner.next_detection.get();
        self.inner.next_detection.set(id + 1);
        self.inner.detections.borrow_mut().push((id, handle));

        let guard = DetectionGuard {
            adapter: self.clone(),
            id,
        };
        let detection: LocalBoxFuture<'static, ReadyState> = Box::pin(async move {
            let guard = guard;
            guard.adapter.detect().await
        });
        Abortable::new(detection, registration)
    }

    /// run the [`WalletAdapter::detection`] on the browser's event loop
    pub fn spawn_detection(&self) {
        let detection = self.detection();
        let wallet = self.name().to_owned();
        wasm_bindgen_futures::spawn_local(async move {
            if detection.await.is_err() {
                debug!(wallet, "wallet detection cancelled");
            }
        });
    }

    /// abort every pending [`WalletAdapter::detection`], returns `false` if
    /// there was none
    pub fn cancel_detection(&self) -> bool {
        let detections = std::mem::take(&mut *self.inner.detections.borrow_mut());
        for (_, handle) in &detections {
            handle.abort();
        }
        !detections.is_empty()
    }

    /// Ask the user to connect the wallet.
    ///
    /// Returns immediately if the wallet is already connected or a connection
    /// is in progress. Fails with [`WalletError::NotReady`] if the wallet was
    /// not detected: the request is not queued.
    pub async fn connect(&self) -> Result<(), WalletError> {
        let inner = &self.inner;
        if self.connected() || self.connecting() {
            return Ok(());
        }

        let ready_state = inner.ready_state.get();
        if !ready_state.is_ready() {
            return Err(self.fail(WalletError::NotReady(ready_state)));
        }
        let Some(driver) = inner.driver().or_else(|| inner.load()) else {
            return Err(self.fail(WalletError::NotReady(ready_state)));
        };

        inner.connecting.set(true);
        let _connecting = FlagGuard(&inner.connecting);
        debug!(wallet = self.name(), "connecting wallet");

        let exchange = pin!(self.establish(driver));
        let result = match inner.config.connect_timeout {
            Some(timeout) => match future::select(exchange, inner.timer.sleep(timeout)).await {
                Either::Left((result, _)) => result,
                Either::Right(((), _)) => Err(WalletError::Connection(ProviderError::new(
                    format!("connection timed out after {}ms", timeout.as_millis()),
                ))),
            },
            None => exchange.await,
        };

        match result {
            Ok(address) => {
                debug!(wallet = self.name(), %address, "wallet connected");
                inner.events.emit(WalletEvent::Connect(address));
                Ok(())
            }
            Err(error) => {
                inner.session.borrow_mut().take();
                Err(self.fail(error))
            }
        }
    }

    async fn establish(&self, driver: L::Driver) -> Result<String, WalletError> {
        // start from a fresh connection
        if driver.is_connected().await.map_err(WalletError::Connection)? {
            trace!(wallet = self.name(), "closing the previous connection");
            driver.disconnect().await.map_err(WalletError::Connection)?;
        }

        let account = match driver.connect().await.map_err(WalletError::Connection)? {
            Some(account) => account,
            None => driver.account().await.map_err(WalletError::Connection)?,
        };
        let address = account.address.clone();
        *self.inner.session.borrow_mut() = Some(Session::connected(account));

        let network = driver.network().await.map_err(WalletError::GetNetwork)?;
        *self.inner.network.borrow_mut() = network;

        Ok(address)
    }

    /// Forget the connected account and ask the wallet to disconnect.
    ///
    /// Always emits [`WalletEvent::Disconnect`], even if nothing was
    /// connected.
    pub async fn disconnect(&self) -> Result<(), WalletError> {
        let session = self.inner.session.borrow_mut().take();
        let mut result = Ok(());

        if let (Some(session), Some(driver)) = (session, self.inner.driver()) {
            debug!(wallet = self.name(), address = %session.address, "disconnecting wallet");
            *self.inner.network.borrow_mut() = NetworkInfo::default();

            if let Err(error) = driver.disconnect().await {
                result = Err(self.fail(WalletError::Disconnection(error)));
            }
        }

        self.inner.events.emit(WalletEvent::Disconnect);
        result
    }

    /// sign the transaction without submitting it, returns the signed
    /// transaction bytes
    pub async fn sign_transaction(
        &self,
        payload: &TransactionPayload,
        options: Option<&TransactionOptions>,
    ) -> Result<Vec<u8>, WalletError> {
        let driver = self.connected_driver()?;
        trace!(wallet = self.name(), function = %payload.function, "signing transaction");

        driver
            .sign_transaction(payload, options)
            .await
            .map_err(|error| self.fail(WalletError::SignTransaction(error)))
    }

    /// sign the transaction and have the wallet submit it
    pub async fn sign_and_submit_transaction(
        &self,
        payload: &TransactionPayload,
        options: Option<&TransactionOptions>,
    ) -> Result<PendingTransaction, WalletError> {
        let driver = self.connected_driver()?;
        trace!(wallet = self.name(), function = %payload.function, "submitting transaction");

        driver
            .sign_and_submit_transaction(payload, options)
            .await
            .map_err(|error| self.fail(WalletError::SignAndSubmit(error)))
    }

    /// sign an arbitrary message with the connected account
    pub async fn sign_message(
        &self,
        payload: &SignMessagePayload,
    ) -> Result<SignMessageResponse, WalletError> {
        let driver = self.connected_driver()?;
        trace!(wallet = self.name(), "signing message");

        driver
            .sign_message(payload)
            .await
            .map_err(|error| self.fail(WalletError::SignMessage(error)))
    }

    /// Follow the account changes of the wallet: the public account is
    /// updated and a [`WalletEvent::AccountChange`] emitted.
    ///
    /// Fails with [`WalletError::Unsupported`] if the wallet does not notify
    /// account changes.
    pub fn on_account_change(&self) -> Result<(), WalletError> {
        let driver = self.connected_driver()?;
        self.ensure_supported(&driver, Feature::AccountChange)?;
        if self.inner.account_subscribed.get() {
            return Ok(());
        }

        let inner = Rc::downgrade(&self.inner);
        driver
            .on_account_change(Rc::new(move |update: Result<AccountInfo, ProviderError>| {
                if let Some(inner) = inner.upgrade() {
                    WalletAdapter { inner }.account_changed(update);
                }
            }))
            .map_err(|error| self.fail(WalletError::AccountChange(error)))?;

        self.inner.account_subscribed.set(true);
        Ok(())
    }

    /// Follow the network changes of the wallet: the network information is
    /// replaced and a [`WalletEvent::NetworkChange`] emitted.
    ///
    /// Fails with [`WalletError::Unsupported`] if the wallet does not notify
    /// network changes.
    pub fn on_network_change(&self) -> Result<(), WalletError> {
        let driver = self.connected_driver()?;
        self.ensure_supported(&driver, Feature::NetworkChange)?;
        if self.inner.network_subscribed.get() {
            return Ok(());
        }

        let inner = Rc::downgrade(&self.inner);
        driver
            .on_network_change(Rc::new(move |update: Result<NetworkInfo, ProviderError>| {
                if let Some(inner) = inner.upgrade() {
                    WalletAdapter { inner }.network_changed(update);
                }
            }))
            .map_err(|error| self.fail(WalletError::NetworkChange(error)))?;

        self.inner.network_subscribed.set(true);
        Ok(())
    }

    fn account_changed(&self, update: Result<AccountInfo, ProviderError>) {
        let account = match update {
            Ok(account) => account,
            Err(error) => {
                self.fail(WalletError::AccountChange(error));
                return;
            }
        };

        let address = {
            let mut session = self.inner.session.borrow_mut();
            let Some(session) = session.as_mut() else {
                trace!(wallet = self.name(), "account change ignored while disconnected");
                return;
            };
            session.update(account);
            session.address.clone()
        };

        debug!(wallet = self.name(), %address, "wallet account changed");
        self.inner.events.emit(WalletEvent::AccountChange(address));
    }

    fn network_changed(&self, update: Result<NetworkInfo, ProviderError>) {
        let network = match update {
            Ok(network) => network,
            Err(error) => {
                self.fail(WalletError::NetworkChange(error));
                return;
            }
        };

        if self.inner.session.borrow().is_none() {
            trace!(wallet = self.name(), "network change ignored while disconnected");
            return;
        }

        let name = network.name.clone();
        *self.inner.network.borrow_mut() = network;
        debug!(wallet = self.name(), network = ?name, "wallet network changed");
        self.inner.events.emit(WalletEvent::NetworkChange(name));
    }

    fn connected_driver(&self) -> Result<L::Driver, WalletError> {
        let has_session = self.inner.session.borrow().is_some();
        match self.inner.driver() {
            Some(driver) if has_session => Ok(driver),
            _ => Err(self.fail(WalletError::NotConnected)),
        }
    }

    fn ensure_supported(&self, driver: &L::Driver, feature: Feature) -> Result<(), WalletError> {
        if driver.supports(feature) {
            Ok(())
        } else {
            Err(self.fail(WalletError::Unsupported {
                wallet: self.name().to_owned(),
                feature,
            }))
        }
    }

    /// broadcast the error before handing it back to the caller
    fn fail(&self, error: WalletError) -> WalletError {
        warn!(wallet = self.name(), %error);
        self.inner.events.emit(WalletEvent::Error(error.clone()));
        error
    }
}

impl<L: Locator> Inner<L> {
    fn driver(&self) -> Option<L::Driver> {
        self.driver.borrow().clone()
    }

    /// loadable wallets are looked up when first needed
    fn load(&self) -> Option<L::Driver> {
        let driver = self.locator.locate()?;
        *self.driver.borrow_mut() = Some(driver.clone());
        Some(driver)
    }

    /// `Unsupported` is terminal
    fn set_ready_state(&self, ready_state: ReadyState) {
        let previous = self.ready_state.get();
        if previous == ready_state || previous == ReadyState::Unsupported {
            return;
        }

        self.ready_state.set(ready_state);
        self.events.emit(WalletEvent::ReadyStateChange(ready_state));
    }
}
