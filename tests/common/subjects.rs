//! Subjects under test with various constructor shapes

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use automocker::{Constructors, Subject};

use super::mocks::{Clock, Database, Journal, Logger, Mailer};

/// Logs a greeting stamped with the current time
pub struct Greeter {
    pub logger: Arc<dyn Logger>,
    pub clock: Arc<dyn Clock>,
}

impl Greeter {
    pub fn new(logger: Arc<dyn Logger>, clock: Arc<dyn Clock>) -> Self {
        Self { logger, clock }
    }

    pub fn greet(&self, name: &str) {
        match self.clock.now() {
            Some(now) => self.logger.log(&format!("[{now}] hello {name}")),
            None => self.logger.log(&format!("hello {name}")),
        }
    }
}

impl Subject for Greeter {
    fn constructors(ctors: &mut Constructors<Self>) {
        ctors.public(Greeter::new);
    }
}

/// Declares the same dependency type twice
pub struct Bad {
    pub primary: Arc<dyn Logger>,
    pub audit: Arc<dyn Logger>,
}

impl Bad {
    pub fn new(primary: Arc<dyn Logger>, audit: Arc<dyn Logger>) -> Self {
        Self { primary, audit }
    }
}

impl Subject for Bad {
    fn constructors(ctors: &mut Constructors<Self>) {
        ctors.public(Bad::new);
    }
}

/// Two public constructors
pub struct Overloaded {
    pub logger: Option<Arc<dyn Logger>>,
}

impl Overloaded {
    pub fn new() -> Self {
        Self { logger: None }
    }

    pub fn with_logger(logger: Arc<dyn Logger>) -> Self {
        Self {
            logger: Some(logger),
        }
    }
}

impl Subject for Overloaded {
    fn constructors(ctors: &mut Constructors<Self>) {
        ctors.public(Overloaded::new).public(Overloaded::with_logger);
    }
}

/// Registers no constructor at all
pub struct Unconstructible;

impl Subject for Unconstructible {
    fn constructors(_ctors: &mut Constructors<Self>) {}
}

/// Only a zero-argument constructor
pub struct Standalone {
    pub id: u32,
}

impl Subject for Standalone {
    fn constructors(ctors: &mut Constructors<Self>) {
        ctors.public(|| Standalone { id: 7 });
    }
}

/// One public constructor next to private ones
pub struct Notifier {
    pub mailer: Arc<dyn Mailer>,
    pub logger: Arc<dyn Logger>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, logger: Arc<dyn Logger>) -> Self {
        Self { mailer, logger }
    }

    fn quiet(mailer: Arc<dyn Mailer>) -> Self {
        unreachable!("private constructor {:p}", Arc::as_ptr(&mailer))
    }

    pub fn notify(&self, to: &str) {
        if self.mailer.send(to) {
            self.logger.log(&format!("notified {to}"));
        }
    }
}

impl Subject for Notifier {
    fn constructors(ctors: &mut Constructors<Self>) {
        ctors.private(Notifier::quiet).public(Notifier::new);
    }
}

/// Constructor that rejects its dependencies
pub struct Strict {
    pub clock: Arc<dyn Clock>,
}

impl Strict {
    pub fn new(clock: Arc<dyn Clock>) -> Result<Self> {
        if clock.now().is_none() {
            anyhow::bail!("clock has no time");
        }
        Ok(Self { clock })
    }
}

impl Subject for Strict {
    fn constructors(ctors: &mut Constructors<Self>) {
        ctors.try_public(Strict::new);
    }
}

/// Needs a dependency the engine cannot mock
pub struct Repository {
    pub db: Arc<dyn Database>,
}

impl Subject for Repository {
    fn constructors(ctors: &mut Constructors<Self>) {
        ctors.public(|db: Arc<dyn Database>| Repository { db });
    }
}

/// Needs a dependency whose engine panics
pub struct Ledger {
    pub journal: Arc<dyn Journal>,
}

impl Subject for Ledger {
    fn constructors(ctors: &mut Constructors<Self>) {
        ctors.public(|journal: Arc<dyn Journal>| Ledger { journal });
    }
}

/// Counts how often its constructor runs
pub static COUNTED_CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

pub struct Counted {
    pub logger: Arc<dyn Logger>,
}

impl Counted {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        COUNTED_CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
        Self { logger }
    }
}

impl Subject for Counted {
    fn constructors(ctors: &mut Constructors<Self>) {
        ctors.public(Counted::new);
    }
}
