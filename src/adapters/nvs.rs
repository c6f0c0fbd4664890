//! NVS (Non-Volatile Storage) frequency store adapter.
//!
//! Record layout in the `buzzer` namespace:
//!
//! - `freq`  — the frequency as a native-endian u16 (2 bytes)
//! - `valid` — one marker byte, expected value [`VALIDITY_MARKER`]
//!
//! `save` commits the frequency first and the marker second. A power loss
//! between the two commits leaves the marker stale, so the next boot
//! rejects the whole record and falls back to the default — a partially
//! completed calibration write is fully discarded, never partially applied.
//!
//! `load` double-guards: a wrong marker rejects the record without even
//! reading the frequency field ("never written"), and a marker match with
//! an out-of-range frequency is rejected too ("written by incompatible
//! firmware"). Both cases recover silently with the compiled-in default.

use log::{info, warn};

use crate::app::ports::{FrequencyStore, StoreError};
use crate::config::{DEFAULT_FREQ_HZ, FREQ_ACCEPT_MAX_HZ, FREQ_ACCEPT_MIN_HZ};

#[cfg(not(target_os = "espidf"))]
use std::cell::RefCell;
#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const NAMESPACE: &str = "buzzer";
const FREQ_KEY: &str = "freq";
const MARKER_KEY: &str = "valid";

/// Sentinel confirming the record was deliberately written by this
/// firmware. Distinct from the erased-flash pattern, so a never-written
/// device reliably reports "invalid".
const VALIDITY_MARKER: u8 = 0xAB;

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Create the adapter and initialise NVS flash.
    ///
    /// On first boot or after a version mismatch the NVS partition is
    /// erased and re-initialised automatically.
    pub fn new() -> Result<Self, StoreError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                let ret2 = unsafe { nvs_flash_erase() };
                if ret2 != ESP_OK {
                    return Err(StoreError::InitFailed);
                }
                let ret3 = unsafe { nvs_flash_init() };
                if ret3 != ESP_OK {
                    return Err(StoreError::InitFailed);
                }
            } else if ret != ESP_OK {
                return Err(StoreError::InitFailed);
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: RefCell::new(HashMap::new()),
        })
    }

    fn accept(freq_hz: u16) -> bool {
        (FREQ_ACCEPT_MIN_HZ..=FREQ_ACCEPT_MAX_HZ).contains(&freq_hz)
    }

    // ── Backend primitives ────────────────────────────────────

    #[cfg(not(target_os = "espidf"))]
    fn read_key(&self, key: &str) -> Option<Vec<u8>> {
        self.store.borrow().get(key).cloned()
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_key(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        self.store.borrow_mut().insert(key.to_owned(), data.to_vec());
        Ok(())
    }

    /// Open the buzzer namespace, run a closure with the handle, close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut ns_buf = [0u8; 16];
        let ns_bytes = NAMESPACE.as_bytes();
        ns_buf[..ns_bytes.len()].copy_from_slice(ns_bytes);

        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    #[cfg(target_os = "espidf")]
    fn read_key(&self, key: &str) -> Option<Vec<u8>> {
        let mut key_buf = [0u8; 16];
        let kb = key.as_bytes();
        key_buf[..kb.len()].copy_from_slice(kb);

        let result = Self::with_nvs_handle(false, |handle| {
            let mut size: usize = 0;
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    key_buf.as_ptr() as *const _,
                    core::ptr::null_mut(),
                    &mut size,
                )
            };
            if ret != ESP_OK || size == 0 || size > 8 {
                return Err(ret);
            }

            let mut buf = vec![0u8; size];
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    key_buf.as_ptr() as *const _,
                    buf.as_mut_ptr() as *mut _,
                    &mut size,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(buf)
        });

        result.ok()
    }

    /// Write one key and commit before returning — the per-key commit is
    /// what gives `save` its freq-then-marker ordering on real flash.
    #[cfg(target_os = "espidf")]
    fn write_key(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut key_buf = [0u8; 16];
        let kb = key.as_bytes();
        key_buf[..kb.len()].copy_from_slice(kb);

        let result = Self::with_nvs_handle(true, |handle| {
            let ret = unsafe {
                nvs_set_blob(
                    handle,
                    key_buf.as_ptr() as *const _,
                    data.as_ptr() as *const _,
                    data.len(),
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(handle) };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(())
        });
        result.map_err(|e| {
            warn!("NvsAdapter: write '{key}' failed (rc={e})");
            StoreError::IoError
        })
    }
}

impl Default for NvsAdapter {
    /// Last-resort fallback when flash init fails: loads fall back to the
    /// default frequency and saves surface [`StoreError::IoError`].
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            #[cfg(not(target_os = "espidf"))]
            store: RefCell::new(HashMap::new()),
        })
    }
}

impl FrequencyStore for NvsAdapter {
    fn load(&self) -> u16 {
        match self.read_key(MARKER_KEY) {
            Some(marker) if marker.as_slice() == [VALIDITY_MARKER] => {}
            _ => {
                info!("NvsAdapter: no valid record, using default {DEFAULT_FREQ_HZ} Hz");
                return DEFAULT_FREQ_HZ;
            }
        }

        let Some(bytes) = self.read_key(FREQ_KEY) else {
            warn!("NvsAdapter: marker present but frequency missing, using default");
            return DEFAULT_FREQ_HZ;
        };
        let Ok(raw) = <[u8; 2]>::try_from(bytes.as_slice()) else {
            warn!("NvsAdapter: malformed frequency record, using default");
            return DEFAULT_FREQ_HZ;
        };

        let freq_hz = u16::from_ne_bytes(raw);
        if !Self::accept(freq_hz) {
            warn!("NvsAdapter: stored {freq_hz} Hz out of range, using default");
            return DEFAULT_FREQ_HZ;
        }

        info!("NvsAdapter: loaded {freq_hz} Hz");
        freq_hz
    }

    fn save(&mut self, freq_hz: u16) -> Result<(), StoreError> {
        // Frequency first, marker second (see module docs).
        self.write_key(FREQ_KEY, &freq_hz.to_ne_bytes())?;
        self.write_key(MARKER_KEY, &[VALIDITY_MARKER])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_loads_default() {
        let nvs = NvsAdapter::new().unwrap();
        assert_eq!(nvs.load(), DEFAULT_FREQ_HZ);
    }

    #[test]
    fn save_load_round_trip() {
        let mut nvs = NvsAdapter::new().unwrap();
        nvs.save(2700).unwrap();
        assert_eq!(nvs.load(), 2700);
    }

    #[test]
    fn round_trip_across_acceptance_range() {
        let mut nvs = NvsAdapter::new().unwrap();
        for freq in [FREQ_ACCEPT_MIN_HZ, 3000, 4200, FREQ_ACCEPT_MAX_HZ] {
            nvs.save(freq).unwrap();
            assert_eq!(nvs.load(), freq);
        }
    }

    #[test]
    fn frequency_without_marker_is_rejected() {
        // Emulates a power loss after the frequency commit but before the
        // marker commit.
        let nvs = NvsAdapter::new().unwrap();
        nvs.write_key(FREQ_KEY, &2700u16.to_ne_bytes()).unwrap();
        assert_eq!(nvs.load(), DEFAULT_FREQ_HZ);
    }

    #[test]
    fn wrong_marker_is_rejected_without_trusting_frequency() {
        let nvs = NvsAdapter::new().unwrap();
        nvs.write_key(FREQ_KEY, &2700u16.to_ne_bytes()).unwrap();
        nvs.write_key(MARKER_KEY, &[0xFF]).unwrap();
        assert_eq!(nvs.load(), DEFAULT_FREQ_HZ);
    }

    #[test]
    fn valid_marker_with_out_of_range_frequency_is_rejected() {
        // A matching marker is not enough: corruption (or an incompatible
        // older firmware) must not be trusted.
        let mut nvs = NvsAdapter::new().unwrap();
        nvs.save(5000).unwrap();
        assert_eq!(nvs.load(), DEFAULT_FREQ_HZ);
        nvs.save(100).unwrap();
        assert_eq!(nvs.load(), DEFAULT_FREQ_HZ);
    }

    #[test]
    fn malformed_frequency_blob_is_rejected() {
        let nvs = NvsAdapter::new().unwrap();
        nvs.write_key(FREQ_KEY, &[0x01]).unwrap();
        nvs.write_key(MARKER_KEY, &[VALIDITY_MARKER]).unwrap();
        assert_eq!(nvs.load(), DEFAULT_FREQ_HZ);
    }

    #[test]
    fn resave_overwrites_previous_record() {
        let mut nvs = NvsAdapter::new().unwrap();
        nvs.save(2400).unwrap();
        nvs.save(2900).unwrap();
        assert_eq!(nvs.load(), 2900);
    }
}
