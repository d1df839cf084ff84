use std::cell::RefCell;
use std::rc::Rc;

/// The single slot holding the bearer token.
pub trait TokenStorage {
    fn read(&self) -> Option<String>;
    fn write(&self, token: &str);
    fn remove(&self);
}

/// `localStorage` under a fixed key. Outside the browser build it behaves
/// as an always-empty slot.
#[derive(Debug, Clone)]
pub struct BrowserTokenStorage {
    #[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
    key: String,
}

impl BrowserTokenStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[cfg(feature = "hydrate")]
mod local_storage {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = localStorage, js_name = getItem)]
        pub fn get_item(key: &str) -> Option<String>;

        #[wasm_bindgen(js_namespace = localStorage, js_name = setItem)]
        pub fn set_item(key: &str, value: &str);

        #[wasm_bindgen(js_namespace = localStorage, js_name = removeItem)]
        pub fn remove_item(key: &str);
    }
}

impl TokenStorage for BrowserTokenStorage {
    fn read(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage::get_item(&self.key).filter(|token| !token.is_empty())
        }

        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn write(&self, token: &str) {
        #[cfg(feature = "hydrate")]
        local_storage::set_item(&self.key, token);

        #[cfg(not(feature = "hydrate"))]
        let _ = token;
    }

    fn remove(&self) {
        #[cfg(feature = "hydrate")]
        local_storage::remove_item(&self.key);
    }
}

/// In-process slot. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStorage {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryTokenStorage {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(token.into()))),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn read(&self) -> Option<String> {
        self.slot.borrow().clone().filter(|token| !token.is_empty())
    }

    fn write(&self, token: &str) {
        *self.slot.borrow_mut() = Some(token.to_string());
    }

    fn remove(&self) {
        self.slot.borrow_mut().take();
    }
}
