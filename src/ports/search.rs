// src/ports/search.rs
use crate::util::debounce::Debouncer;
use std::time::Duration;
use tokio::sync::mpsc;

/// Text box whose every edit is forwarded to a debounce stage
pub struct SearchBox {
    value: String,
    debouncer: Debouncer<String>,
}

impl SearchBox {
    /// Returns the box and the receiver of settled search terms
    pub fn spawn(delay: Duration) -> (Self, mpsc::Receiver<String>) {
        let (debouncer, settled) = Debouncer::spawn(delay);
        (
            Self {
                value: String::new(),
                debouncer,
            },
            settled,
        )
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn input(&mut self, text: &str) {
        self.value = text.to_string();
        self.debouncer.push(self.value.clone());
    }
}
