//! Dependency traits and hand-written mocks
//!
//! Mocks keep their state behind locks so tests can configure and inspect
//! them through a shared reference, even after the subject holds them.

use std::sync::Arc;

use anyhow::Result;
use automocker::{DefaultValue, Mockable, Placeholders, Signature, TypeKey};
use parking_lot::Mutex;

pub trait Logger: Send + Sync {
    fn log(&self, line: &str);
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Option<u64>;
}

pub trait Mailer: Send + Sync {
    fn send(&self, to: &str) -> bool;
}

/// Records every line logged
#[derive(Default)]
pub struct MockLogger {
    lines: Mutex<Vec<String>>,
}

impl MockLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.lines.lock().len()
    }
}

impl Logger for MockLogger {
    fn log(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

automocker::impl_mockable!(dyn Logger => MockLogger);

/// Answers `now` from a configured value, or per its default-value policy
pub struct MockClock {
    now: Mutex<Option<u64>>,
    policy: Mutex<DefaultValue>,
    calls: Mutex<usize>,
}

impl MockClock {
    pub fn set_now(&self, now: u64) {
        *self.now.lock() = Some(now);
    }

    pub fn policy(&self) -> DefaultValue {
        *self.policy.lock()
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Option<u64> {
        *self.calls.lock() += 1;
        match (*self.now.lock(), self.policy()) {
            (Some(now), _) => Some(now),
            (None, DefaultValue::Empty) => None,
            (None, DefaultValue::Mock) => Some(u64::MAX),
        }
    }
}

impl Mockable for dyn Clock {
    type Mock = MockClock;

    fn create(_placeholders: Placeholders) -> Result<MockClock> {
        Ok(MockClock {
            now: Mutex::new(None),
            policy: Mutex::new(DefaultValue::Mock),
            calls: Mutex::new(0),
        })
    }

    fn set_default_value(mock: &mut MockClock, policy: DefaultValue) {
        *mock.policy.get_mut() = policy;
    }

    fn object(mock: Arc<MockClock>) -> Arc<dyn Clock> {
        mock
    }
}

/// Mailer stand-in built from constructor-shaped placeholders
pub struct MockMailer {
    pub placeholders: usize,
    pub sent: Mutex<Vec<String>>,
}

impl Mailer for MockMailer {
    fn send(&self, to: &str) -> bool {
        self.sent.lock().push(to.to_string());
        true
    }
}

impl Mockable for dyn Mailer {
    type Mock = MockMailer;

    fn signatures() -> Vec<Signature> {
        vec![
            Signature::public(vec![TypeKey::of::<String>(), TypeKey::of::<u16>()]),
            Signature::private(vec![TypeKey::of::<String>()]),
        ]
    }

    fn create(placeholders: Placeholders) -> Result<MockMailer> {
        Ok(MockMailer {
            placeholders: placeholders.len(),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn object(mock: Arc<MockMailer>) -> Arc<dyn Mailer> {
        mock
    }
}

/// Dependency the engine cannot mock
pub trait Database: Send + Sync {}

pub struct UnmockableDatabase;

impl Database for UnmockableDatabase {}

impl Mockable for dyn Database {
    type Mock = UnmockableDatabase;

    fn create(_placeholders: Placeholders) -> Result<UnmockableDatabase> {
        anyhow::bail!("sealed trait cannot be proxied")
    }

    fn object(mock: Arc<UnmockableDatabase>) -> Arc<dyn Database> {
        mock
    }
}

pub trait Journal: Send + Sync {}

/// Stand-in whose engine panics instead of returning an error
pub struct PanickingJournal;

impl Journal for PanickingJournal {}

impl Mockable for dyn Journal {
    type Mock = PanickingJournal;

    fn create(_placeholders: Placeholders) -> Result<PanickingJournal> {
        panic!("engine blew up")
    }

    fn object(mock: Arc<PanickingJournal>) -> Arc<dyn Journal> {
        mock
    }
}
