use super::*;
use crate::{
    Network, PublicKey, Signature,
    driver::{AccountListener, NetworkListener},
    probe::{ProbeConfig, tests::CountingTimer},
};
use async_trait::async_trait;
use futures::{FutureExt as _, channel::oneshot, executor::block_on, future::Aborted};
use std::time::Duration;

#[derive(Default)]
struct ProviderState {
    calls: RefCell<Vec<&'static str>>,
    already_connected: Cell<bool>,
    connect_answers_account: Cell<bool>,
    connect_gate: RefCell<Option<oneshot::Receiver<()>>>,
    connect_error: RefCell<Option<ProviderError>>,
    network_error: RefCell<Option<ProviderError>>,
    disconnect_error: RefCell<Option<ProviderError>>,
    sign_message_error: RefCell<Option<ProviderError>>,
    supports_changes: Cell<bool>,
    account_listener: RefCell<Option<AccountListener>>,
    network_listener: RefCell<Option<NetworkListener>>,
}

#[derive(Clone, Default)]
struct MockDriver(Rc<ProviderState>);

impl MockDriver {
    fn record(&self, call: &'static str) {
        self.0.calls.borrow_mut().push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.0.calls.borrow().clone()
    }

    fn count(&self, call: &str) -> usize {
        self.0.calls.borrow().iter().filter(|c| **c == call).count()
    }

    fn notify_account(&self, update: Result<AccountInfo, ProviderError>) {
        let listener = self.0.account_listener.borrow().clone();
        listener.expect("no account listener registered")(update);
    }

    fn notify_network(&self, update: Result<NetworkInfo, ProviderError>) {
        let listener = self.0.network_listener.borrow().clone();
        listener.expect("no network listener registered")(update);
    }
}

fn account(address: &str) -> AccountInfo {
    AccountInfo {
        address: address.to_owned(),
        public_key: PublicKey::Single(format!("{address}aa")),
        auth_key: Some(address.to_owned()),
        min_keys_required: None,
    }
}

#[async_trait(?Send)]
impl WalletDriver for MockDriver {
    async fn is_connected(&self) -> Result<bool, ProviderError> {
        self.record("isConnected");
        Ok(self.0.already_connected.get())
    }

    async fn connect(&self) -> Result<Option<AccountInfo>, ProviderError> {
        self.record("connect");
        let gate = self.0.connect_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(error) = self.0.connect_error.borrow_mut().take() {
            return Err(error);
        }

        self.0.already_connected.set(true);
        if self.0.connect_answers_account.get() {
            Ok(Some(account("0x1")))
        } else {
            Ok(None)
        }
    }

    async fn account(&self) -> Result<AccountInfo, ProviderError> {
        self.record("account");
        Ok(account("0x1"))
    }

    async fn network(&self) -> Result<NetworkInfo, ProviderError> {
        self.record("network");
        if let Some(error) = self.0.network_error.borrow_mut().take() {
            return Err(error);
        }
        Ok(NetworkInfo {
            name: Some(Network::Testnet),
            chain_id: Some("2".to_owned()),
            api: None,
        })
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        self.record("disconnect");
        self.0.already_connected.set(false);
        match self.0.disconnect_error.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn sign_transaction(
        &self,
        _payload: &TransactionPayload,
        _options: Option<&TransactionOptions>,
    ) -> Result<Vec<u8>, ProviderError> {
        self.record("signTransaction");
        Ok(vec![1, 2, 3])
    }

    async fn sign_and_submit_transaction(
        &self,
        _payload: &TransactionPayload,
        _options: Option<&TransactionOptions>,
    ) -> Result<PendingTransaction, ProviderError> {
        self.record("signAndSubmitTransaction");
        Ok(PendingTransaction {
            hash: "0xabc".to_owned(),
        })
    }

    async fn sign_message(
        &self,
        payload: &SignMessagePayload,
    ) -> Result<SignMessageResponse, ProviderError> {
        self.record("signMessage");
        if let Some(error) = self.0.sign_message_error.borrow_mut().take() {
            return Err(error);
        }
        Ok(SignMessageResponse {
            address: None,
            application: None,
            chain_id: None,
            full_message: format!("APTOS\nmessage: {}\nnonce: {}", payload.message, payload.nonce),
            message: payload.message.clone(),
            nonce: payload.nonce.clone(),
            prefix: "APTOS".to_owned(),
            signature: Signature::Single("0xsig".to_owned()),
        })
    }

    fn supports(&self, _feature: Feature) -> bool {
        self.0.supports_changes.get()
    }

    fn on_account_change(&self, listener: AccountListener) -> Result<(), ProviderError> {
        self.record("onAccountChange");
        *self.0.account_listener.borrow_mut() = Some(listener);
        Ok(())
    }

    fn on_network_change(&self, listener: NetworkListener) -> Result<(), ProviderError> {
        self.record("onNetworkChange");
        *self.0.network_listener.borrow_mut() = Some(listener);
        Ok(())
    }
}

struct MockLocator {
    supported: bool,
    driver: MockDriver,
    /// number of elapsed intervals after which the provider is injected
    appears_after: Option<u32>,
    handshake: Option<Result<(), ProviderError>>,
    sleeps: Rc<Cell<u32>>,
    lookups: Rc<Cell<u32>>,
}

#[async_trait(?Send)]
impl Locator for MockLocator {
    type Driver = MockDriver;

    fn name(&self) -> &str {
        "Mock"
    }

    fn url(&self) -> String {
        "https://wallet.example".to_owned()
    }

    fn icon(&self) -> &str {
        "data:image/png;base64,"
    }

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn discovery(&self, probe: ProbeConfig) -> Discovery {
        if self.handshake.is_some() {
            Discovery::Handshake
        } else {
            Discovery::Poll(probe)
        }
    }

    fn locate(&self) -> Option<MockDriver> {
        self.lookups.set(self.lookups.get() + 1);
        match self.appears_after {
            Some(after) if self.sleeps.get() >= after => Some(self.driver.clone()),
            _ => None,
        }
    }

    async fn handshake(&self) -> Result<MockDriver, ProviderError> {
        match &self.handshake {
            Some(Ok(())) => Ok(self.driver.clone()),
            Some(Err(error)) => Err(error.clone()),
            None => Err(ProviderError::new("no handshake")),
        }
    }
}

struct Harness {
    adapter: WalletAdapter<MockLocator>,
    driver: MockDriver,
    timer: CountingTimer,
    lookups: Rc<Cell<u32>>,
    events: Rc<RefCell<Vec<WalletEvent>>>,
}

impl Harness {
    fn events(&self) -> Vec<WalletEvent> {
        self.events.borrow().clone()
    }

    fn errors(&self) -> Vec<WalletError> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                WalletEvent::Error(error) => Some(error.clone()),
                _ => None,
            })
            .collect()
    }

    fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }
}

fn test_config() -> AdapterConfig {
    AdapterConfig::default()
        .with_connect_timeout(None)
        .with_probe(ProbeConfig {
            interval: Duration::from_millis(100),
            max_attempts: 5,
        })
}

fn harness_with(
    supported: bool,
    appears_after: Option<u32>,
    handshake: Option<Result<(), ProviderError>>,
    config: AdapterConfig,
) -> Harness {
    let driver = MockDriver::default();
    let timer = CountingTimer::default();
    let lookups = Rc::new(Cell::new(0));
    let locator = MockLocator {
        supported,
        driver: driver.clone(),
        appears_after,
        handshake,
        sleeps: timer.sleeps.clone(),
        lookups: lookups.clone(),
    };
    let adapter = WalletAdapter::with_timer(locator, config, timer.clone());

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    adapter.on_all(move |event| sink.borrow_mut().push(event.clone()));

    Harness {
        adapter,
        driver,
        timer,
        lookups,
        events,
    }
}

fn harness(appears_after: Option<u32>) -> Harness {
    harness_with(true, appears_after, None, test_config())
}

/// a wallet detected and ready to connect, with an empty event log
fn installed() -> Harness {
    let harness = harness(Some(0));
    assert_eq!(block_on(harness.adapter.detect()), ReadyState::Installed);
    harness.clear_events();
    harness
}

fn connected() -> Harness {
    let harness = installed();
    block_on(harness.adapter.connect()).unwrap();
    harness.clear_events();
    harness
}

fn transfer() -> TransactionPayload {
    TransactionPayload::entry_function(
        "0x1::coin::transfer",
        ["0x1::aptos_coin::AptosCoin"],
        [serde_json::json! { "0x2" }, serde_json::json! { "1000" }],
    )
}

#[test]
fn metadata() {
    let harness = harness(None);

    assert_eq!(harness.adapter.name(), "Mock");
    assert_eq!(harness.adapter.url(), "https://wallet.example");
    assert_eq!(harness.adapter.icon(), "data:image/png;base64,");
    assert_eq!(harness.adapter.ready_state(), ReadyState::NotDetected);
    assert!(!harness.adapter.connected());
    assert!(!harness.adapter.connecting());
    assert_eq!(harness.adapter.public_account(), AccountKeys::default());
    assert_eq!(harness.adapter.network(), NetworkInfo::default());
}

#[test]
fn connect_unsupported_is_not_ready() {
    let harness = harness_with(false, Some(0), None, test_config());
    assert_eq!(harness.adapter.ready_state(), ReadyState::Unsupported);

    let error = block_on(harness.adapter.connect()).unwrap_err();

    assert_eq!(error, WalletError::NotReady(ReadyState::Unsupported));
    assert!(harness.driver.calls().is_empty());
    assert_eq!(harness.errors(), vec![error]);
}

#[test]
fn connect_before_detection_is_not_ready() {
    let harness = harness(Some(0));

    let error = block_on(harness.adapter.connect()).unwrap_err();

    assert_eq!(error, WalletError::NotReady(ReadyState::NotDetected));
    assert!(harness.driver.calls().is_empty());
    assert!(!harness.adapter.connecting());
}

#[test]
fn immediate_detection() {
    let harness = harness(Some(0));

    assert_eq!(block_on(harness.adapter.detect()), ReadyState::Installed);

    assert_eq!(harness.timer.sleeps.get(), 0);
    assert_eq!(
        harness.events(),
        vec![WalletEvent::ReadyStateChange(ReadyState::Installed)]
    );
}

#[test]
fn provider_injected_after_three_intervals() {
    let harness = harness(Some(3));
    let seen_at = Rc::new(RefCell::new(Vec::new()));
    let sleeps = harness.timer.sleeps.clone();
    let sink = seen_at.clone();
    harness.adapter.on(EventKind::ReadyStateChange, move |event| {
        sink.borrow_mut().push((sleeps.get(), event.clone()));
    });

    assert_eq!(block_on(harness.adapter.detect()), ReadyState::Installed);

    assert_eq!(
        *seen_at.borrow(),
        vec![(3, WalletEvent::ReadyStateChange(ReadyState::Installed))]
    );
    assert_eq!(harness.timer.sleeps.get(), 3);

    // already detected: nothing more happens
    assert_eq!(block_on(harness.adapter.detect()), ReadyState::Installed);
    assert_eq!(seen_at.borrow().len(), 1);
    assert_eq!(harness.lookups.get(), 4);
}

#[test]
fn detection_gives_up_at_the_attempt_budget() {
    let harness = harness(None);

    assert_eq!(block_on(harness.adapter.detect()), ReadyState::NotDetected);

    assert_eq!(harness.timer.sleeps.get(), 5);
    assert_eq!(harness.lookups.get(), 6);
    assert!(harness.events().is_empty());

    // detection can be started again later
    assert_eq!(block_on(harness.adapter.detect()), ReadyState::NotDetected);
    assert_eq!(harness.timer.sleeps.get(), 10);
}

#[test]
fn unsupported_never_probes() {
    let harness = harness_with(false, Some(0), None, test_config());

    assert_eq!(block_on(harness.adapter.detect()), ReadyState::Unsupported);

    assert_eq!(harness.lookups.get(), 0);
    assert!(harness.events().is_empty());
}

#[test]
fn handshake_detection() {
    let harness = harness_with(true, None, Some(Ok(())), test_config());

    assert_eq!(block_on(harness.adapter.detect()), ReadyState::Installed);

    assert_eq!(harness.lookups.get(), 0);
    assert_eq!(
        harness.events(),
        vec![WalletEvent::ReadyStateChange(ReadyState::Installed)]
    );
    block_on(harness.adapter.connect()).unwrap();
    assert!(harness.adapter.connected());
}

#[test]
fn failed_handshake_is_unsupported_for_good() {
    let harness = harness_with(
        true,
        None,
        Some(Err(ProviderError::new("not inside the MSafe app"))),
        test_config(),
    );

    assert_eq!(block_on(harness.adapter.detect()), ReadyState::Unsupported);
    assert_eq!(
        harness.events(),
        vec![WalletEvent::ReadyStateChange(ReadyState::Unsupported)]
    );

    assert_eq!(block_on(harness.adapter.detect()), ReadyState::Unsupported);
    assert_eq!(
        block_on(harness.adapter.connect()),
        Err(WalletError::NotReady(ReadyState::Unsupported))
    );
}

#[test]
fn cancelled_detection() {
    let harness = harness(None);
    let detection = harness.adapter.detection();

    assert!(harness.adapter.cancel_detection());
    assert!(!harness.adapter.cancel_detection());

    assert_eq!(block_on(detection), Err(Aborted));
    assert_eq!(harness.adapter.ready_state(), ReadyState::NotDetected);
    assert_eq!(harness.lookups.get(), 0);
}

#[test]
fn completed_detection() {
    let harness = harness(Some(2));

    assert_eq!(
        block_on(harness.adapter.detection()),
        Ok(ReadyState::Installed)
    );
    assert_eq!(harness.timer.sleeps.get(), 2);
    assert!(!harness.adapter.cancel_detection());
}

/// delays that never elapse: the probe stays parked on its first wait
struct StalledTimer;

impl Timer for StalledTimer {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(future::pending())
    }
}

#[test]
fn cancel_reaches_the_running_detection() {
    let lookups = Rc::new(Cell::new(0));
    let locator = MockLocator {
        supported: true,
        driver: MockDriver::default(),
        appears_after: None,
        handshake: None,
        sleeps: Rc::new(Cell::new(0)),
        lookups: lookups.clone(),
    };
    let adapter = WalletAdapter::with_timer(locator, test_config(), StalledTimer);

    let mut running = adapter.detection();
    assert_eq!((&mut running).now_or_never(), None);
    assert_eq!(lookups.get(), 1);

    // started while the first one probes: resolves at once
    assert_eq!(
        adapter.detection().now_or_never(),
        Some(Ok(ReadyState::NotDetected))
    );

    assert!(adapter.cancel_detection());
    assert_eq!(running.now_or_never(), Some(Err(Aborted)));
    assert!(!adapter.cancel_detection());

    // the aborted probe released the adapter
    let mut next = adapter.detection();
    assert_eq!((&mut next).now_or_never(), None);
    assert_eq!(lookups.get(), 2);
}

#[test]
fn connect_opens_a_session() {
    let harness = installed();

    block_on(harness.adapter.connect()).unwrap();

    assert!(harness.adapter.connected());
    assert!(!harness.adapter.connecting());
    assert_eq!(harness.adapter.public_account().address.as_deref(), Some("0x1"));
    assert_eq!(
        harness.adapter.public_account().public_key,
        Some(PublicKey::Single("0x1aa".to_owned()))
    );
    assert_eq!(harness.adapter.network().name, Some(Network::Testnet));
    assert_eq!(harness.adapter.network().chain_id.as_deref(), Some("2"));
    assert_eq!(
        harness.driver.calls(),
        vec!["isConnected", "connect", "account", "network"]
    );
    assert_eq!(harness.events(), vec![WalletEvent::Connect("0x1".to_owned())]);
}

#[test]
fn connect_uses_the_account_it_is_given() {
    let harness = installed();
    harness.driver.0.connect_answers_account.set(true);

    block_on(harness.adapter.connect()).unwrap();

    assert_eq!(harness.driver.count("account"), 0);
    assert_eq!(harness.adapter.public_account().address.as_deref(), Some("0x1"));
}

#[test]
fn connect_closes_a_stale_connection_first() {
    let harness = installed();
    harness.driver.0.already_connected.set(true);

    block_on(harness.adapter.connect()).unwrap();

    assert_eq!(
        harness.driver.calls(),
        vec!["isConnected", "disconnect", "connect", "account", "network"]
    );
}

#[test]
fn concurrent_connects_call_the_provider_once() {
    let harness = installed();
    let (release, gate) = oneshot::channel();
    *harness.driver.0.connect_gate.borrow_mut() = Some(gate);

    let (first, second, ()) = block_on(async {
        futures::join!(
            harness.adapter.connect(),
            harness.adapter.connect(),
            async {
                assert!(harness.adapter.connecting());
                release.send(()).unwrap();
            }
        )
    });

    assert_eq!(first, Ok(()));
    assert_eq!(second, Ok(()));
    assert_eq!(harness.driver.count("connect"), 1);
    assert_eq!(harness.events(), vec![WalletEvent::Connect("0x1".to_owned())]);
}

#[test]
fn connect_when_connected_does_nothing() {
    let harness = connected();
    let calls = harness.driver.calls().len();

    block_on(harness.adapter.connect()).unwrap();

    assert_eq!(harness.driver.calls().len(), calls);
    assert!(harness.events().is_empty());
}

#[test]
fn failed_connect_resets_the_adapter() {
    let harness = installed();
    *harness.driver.0.connect_error.borrow_mut() = Some(ProviderError::with_code(4001, "rejected"));

    let error = block_on(harness.adapter.connect()).unwrap_err();

    assert_eq!(
        error,
        WalletError::Connection(ProviderError::with_code(4001, "rejected"))
    );
    assert!(!harness.adapter.connecting());
    assert!(!harness.adapter.connected());
    assert_eq!(harness.events(), vec![WalletEvent::Error(error)]);

    // the next attempt goes through
    block_on(harness.adapter.connect()).unwrap();
    assert!(harness.adapter.connected());
}

#[test]
fn network_failure_fails_the_connection() {
    let harness = installed();
    *harness.driver.0.network_error.borrow_mut() = Some(ProviderError::new("network unavailable"));

    let error = block_on(harness.adapter.connect()).unwrap_err();

    assert_eq!(
        error,
        WalletError::GetNetwork(ProviderError::new("network unavailable"))
    );
    assert!(!harness.adapter.connected());
    assert_eq!(harness.adapter.public_account(), AccountKeys::default());
    assert_eq!(harness.errors(), vec![error]);
}

#[test]
fn connect_times_out() {
    let config = test_config().with_connect_timeout(Some(Duration::from_secs(10)));
    let harness = harness_with(true, Some(0), None, config);
    block_on(harness.adapter.detect());
    let (_release, gate) = oneshot::channel::<()>();
    *harness.driver.0.connect_gate.borrow_mut() = Some(gate);

    let error = block_on(harness.adapter.connect()).unwrap_err();

    assert!(matches!(
        &error,
        WalletError::Connection(ProviderError { message, .. }) if message.contains("timed out after 10000ms")
    ));
    assert!(!harness.adapter.connecting());
    assert!(!harness.adapter.connected());
}

#[test]
fn disconnect_without_session() {
    let harness = harness(None);

    assert_eq!(block_on(harness.adapter.disconnect()), Ok(()));

    assert_eq!(harness.events(), vec![WalletEvent::Disconnect]);
    assert!(harness.driver.calls().is_empty());
}

#[test]
fn disconnect_clears_the_session() {
    let harness = connected();

    block_on(harness.adapter.disconnect()).unwrap();

    assert!(!harness.adapter.connected());
    assert_eq!(harness.adapter.public_account(), AccountKeys::default());
    assert_eq!(harness.adapter.network(), NetworkInfo::default());
    assert_eq!(harness.adapter.ready_state(), ReadyState::Installed);
    assert_eq!(harness.driver.count("disconnect"), 1);
    assert_eq!(harness.events(), vec![WalletEvent::Disconnect]);

    // twice is fine
    block_on(harness.adapter.disconnect()).unwrap();
    assert_eq!(harness.driver.count("disconnect"), 1);
}

#[test]
fn failed_disconnect_still_disconnects() {
    let harness = connected();
    *harness.driver.0.disconnect_error.borrow_mut() = Some(ProviderError::new("busy"));

    let error = block_on(harness.adapter.disconnect()).unwrap_err();

    assert_eq!(error, WalletError::Disconnection(ProviderError::new("busy")));
    assert!(!harness.adapter.connected());
    assert_eq!(
        harness.events(),
        vec![WalletEvent::Error(error), WalletEvent::Disconnect]
    );
}

#[test]
fn signing_requires_a_session() {
    let harness = installed();

    assert_eq!(
        block_on(harness.adapter.sign_transaction(&transfer(), None)),
        Err(WalletError::NotConnected)
    );
    assert_eq!(
        block_on(harness.adapter.sign_and_submit_transaction(&transfer(), None)),
        Err(WalletError::NotConnected)
    );
    assert_eq!(
        block_on(
            harness
                .adapter
                .sign_message(&SignMessagePayload::new("hello", "1"))
        ),
        Err(WalletError::NotConnected)
    );

    assert!(harness.driver.calls().is_empty());
    assert_eq!(harness.errors().len(), 3);
}

#[test]
fn sign_transactions() {
    let harness = connected();
    let options = TransactionOptions {
        max_gas_amount: Some(2000),
        ..TransactionOptions::default()
    };

    assert_eq!(
        block_on(harness.adapter.sign_transaction(&transfer(), Some(&options))),
        Ok(vec![1, 2, 3])
    );
    assert_eq!(
        block_on(harness.adapter.sign_and_submit_transaction(&transfer(), None))
            .unwrap()
            .hash,
        "0xabc"
    );
    assert!(harness.events().is_empty());
}

#[test]
fn sign_message() {
    let harness = connected();

    let response = block_on(
        harness
            .adapter
            .sign_message(&SignMessagePayload::new("hello", "42")),
    )
    .unwrap();

    assert_eq!(response.message, "hello");
    assert_eq!(response.nonce, "42");
    assert_eq!(response.prefix, "APTOS");
}

#[test]
fn rejected_sign_message_is_reported_once() {
    let harness = connected();
    *harness.driver.0.sign_message_error.borrow_mut() =
        Some(ProviderError::with_code(4001, "User rejected the request"));

    let error = block_on(
        harness
            .adapter
            .sign_message(&SignMessagePayload::new("hello", "42")),
    )
    .unwrap_err();

    let WalletError::SignMessage(provider_error) = &error else {
        panic!("unexpected error: {error:?}");
    };
    assert_eq!(provider_error.message, "User rejected the request");
    assert_eq!(harness.errors(), vec![error]);
}

#[test]
fn account_changes() {
    let harness = connected();
    harness.driver.0.supports_changes.set(true);

    harness.adapter.on_account_change().unwrap();
    harness.adapter.on_account_change().unwrap();
    assert_eq!(harness.driver.count("onAccountChange"), 1);

    harness.driver.notify_account(Ok(AccountInfo {
        auth_key: None,
        ..account("0x9")
    }));

    let public_account = harness.adapter.public_account();
    assert_eq!(public_account.address.as_deref(), Some("0x9"));
    assert_eq!(
        public_account.public_key,
        Some(PublicKey::Single("0x9aa".to_owned()))
    );
    // not part of the notification: kept
    assert_eq!(public_account.auth_key.as_deref(), Some("0x1"));
    assert_eq!(
        harness.events(),
        vec![WalletEvent::AccountChange("0x9".to_owned())]
    );

    harness
        .driver
        .notify_account(Err(ProviderError::new("wallet locked")));
    assert_eq!(
        harness.errors(),
        vec![WalletError::AccountChange(ProviderError::new("wallet locked"))]
    );
}

#[test]
fn network_changes() {
    let harness = connected();
    harness.driver.0.supports_changes.set(true);

    harness.adapter.on_network_change().unwrap();
    harness.driver.notify_network(Ok(NetworkInfo {
        name: Some(Network::Mainnet),
        chain_id: Some("1".to_owned()),
        api: None,
    }));

    assert_eq!(harness.adapter.network().name, Some(Network::Mainnet));
    assert_eq!(harness.adapter.network().chain_id.as_deref(), Some("1"));
    assert_eq!(
        harness.events(),
        vec![WalletEvent::NetworkChange(Some(Network::Mainnet))]
    );
}

#[test]
fn changes_after_disconnect_are_ignored() {
    let harness = connected();
    harness.driver.0.supports_changes.set(true);
    harness.adapter.on_account_change().unwrap();
    harness.adapter.on_network_change().unwrap();
    block_on(harness.adapter.disconnect()).unwrap();
    harness.clear_events();

    harness.driver.notify_account(Ok(account("0x9")));
    harness.driver.notify_network(Ok(NetworkInfo::default()));

    assert!(harness.events().is_empty());
    assert_eq!(harness.adapter.public_account(), AccountKeys::default());
}

#[test]
fn unsupported_change_notifications_are_reported() {
    let harness = connected();

    let error = harness.adapter.on_account_change().unwrap_err();
    assert_eq!(
        error,
        WalletError::Unsupported {
            wallet: "Mock".to_owned(),
            feature: Feature::AccountChange,
        }
    );
    assert_eq!(error.to_string(), "Mock does not support account change notifications.");

    assert!(matches!(
        harness.adapter.on_network_change(),
        Err(WalletError::Unsupported {
            feature: Feature::NetworkChange,
            ..
        })
    ));
    assert_eq!(harness.errors().len(), 2);
    assert_eq!(harness.driver.count("onAccountChange"), 0);
}

#[test]
fn change_notifications_require_a_session() {
    let harness = installed();
    harness.driver.0.supports_changes.set(true);

    assert_eq!(
        harness.adapter.on_account_change(),
        Err(WalletError::NotConnected)
    );
    assert_eq!(
        harness.adapter.on_network_change(),
        Err(WalletError::NotConnected)
    );
    assert!(harness.driver.calls().is_empty());
}

#[test]
fn subscribers_see_the_lifecycle() {
    use futures::StreamExt as _;

    let harness = harness(Some(0));
    let events = harness.adapter.subscribe();

    block_on(harness.adapter.detect());
    block_on(harness.adapter.connect()).unwrap();
    block_on(harness.adapter.disconnect()).unwrap();
    drop(harness);

    assert_eq!(
        block_on(events.collect::<Vec<_>>()),
        vec![
            WalletEvent::ReadyStateChange(ReadyState::Installed),
            WalletEvent::Connect("0x1".to_owned()),
            WalletEvent::Disconnect,
        ]
    );
}
