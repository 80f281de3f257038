//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key mapping is platform-neutral and tested natively)
//! - The browser host: canvas, frame loop, DOM overlays, LocalStorage

pub mod input;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// LocalStorage helpers shared by settings and records
#[cfg(target_arch = "wasm32")]
pub(crate) mod storage {
    pub fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    pub fn load<T: serde::de::DeserializeOwned>(key: &str) -> Option<T> {
        let json = local_storage()?.get_item(key).ok()??;
        serde_json::from_str(&json).ok()
    }

    pub fn save<T: serde::Serialize>(key: &str, value: &T) {
        if let (Some(storage), Ok(json)) = (local_storage(), serde_json::to_string(value)) {
            if storage.set_item(key, &json).is_err() {
                log::warn!("Failed to write '{}' to LocalStorage", key);
            }
        }
    }
}
