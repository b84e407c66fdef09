use crate::{Network, ReadyState, WalletError};
use futures::channel::mpsc;
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

/// Notification emitted by a [`WalletAdapter`].
///
/// [`WalletAdapter`]: crate::WalletAdapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    ReadyStateChange(ReadyState),
    /// the wallet connected the given account address
    Connect(String),
    Disconnect,
    /// the wallet switched to the given account address
    AccountChange(String),
    NetworkChange(Option<Network>),
    Error(WalletError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    ReadyStateChange,
    Connect,
    Disconnect,
    AccountChange,
    NetworkChange,
    Error,
}

impl WalletEvent {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::ReadyStateChange(_) => EventKind::ReadyStateChange,
            Self::Connect(_) => EventKind::Connect,
            Self::Disconnect => EventKind::Disconnect,
            Self::AccountChange(_) => EventKind::AccountChange,
            Self::NetworkChange(_) => EventKind::NetworkChange,
            Self::Error(_) => EventKind::Error,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadyStateChange => write!(f, "readyStateChange"),
            Self::Connect => write!(f, "connect"),
            Self::Disconnect => write!(f, "disconnect"),
            Self::AccountChange => write!(f, "accountChange"),
            Self::NetworkChange => write!(f, "networkChange"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Handle returned when registering a listener, used to remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&WalletEvent)>;

#[derive(Default)]
pub(crate) struct EventEmitter {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Option<EventKind>, Listener)>>,
    subscribers: RefCell<Vec<mpsc::UnboundedSender<WalletEvent>>>,
}

impl EventEmitter {
    pub(crate) fn on(&self, kind: Option<EventKind>, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, kind, listener));
        id
    }

    pub(crate) fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _, _)| *listener_id != id);
        listeners.len() != before
    }

    pub(crate) fn subscribe(&self) -> mpsc::UnboundedReceiver<WalletEvent> {
        let (sender, receiver) = mpsc::unbounded();
        self.subscribers.borrow_mut().push(sender);
        receiver
    }

    pub(crate) fn emit(&self, event: WalletEvent) {
        // listeners may register or remove listeners while being called
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| kind.is_none_or(|kind| kind == event.kind()))
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener(&event);
        }

        self.subscribers
            .borrow_mut()
            .retain(|sender| sender.unbounded_send(event.clone()).is_ok());
    }
}
