//! Fake capability implementations for cross-module scenario tests.
//!
//! Integration tests link against the compiled `dullahan_core` rlib, which
//! does not carry its `#[cfg(test)]` unit-test fakes - these are the
//! equivalent built from the public capability traits only.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use dullahan_core::session::{Clock, SessionStorage, Transport};
use dullahan_core::CoreError;

#[derive(Debug, Default)]
pub struct FakeClock {
    pub now: RefCell<f64>,
}

impl Clock for FakeClock {
    fn now_ms(&self) -> f64 {
        *self.now.borrow()
    }
}

impl FakeClock {
    pub fn advance(&self, ms: f64) {
        *self.now.borrow_mut() += ms;
    }
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    pub sent: RefCell<Vec<String>>,
    pub open: RefCell<bool>,
}

#[async_trait::async_trait(?Send)]
impl Transport for FakeTransport {
    async fn send_text(&self, data: &str) -> Result<(), CoreError> {
        if !*self.open.borrow() {
            return Err(CoreError::ConnectionLost);
        }
        self.sent.borrow_mut().push(data.to_string());
        Ok(())
    }

    fn is_open(&self) -> bool {
        *self.open.borrow()
    }
}

#[derive(Debug, Default)]
pub struct FakeStorage {
    pub map: RefCell<HashMap<String, String>>,
}

impl SessionStorage for FakeStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.map.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.map.borrow_mut().remove(key);
    }
}
