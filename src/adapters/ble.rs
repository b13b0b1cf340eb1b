//! BLE peripheral adapter.
//!
//! Implements [`RadioPort`] (stack bring-up, advertising) and [`LinkPort`]
//! (notifications) on top of the Bluedroid GATT server.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: Bluedroid via raw `esp_idf_svc::sys` calls.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## GATT Service Layout
//!
//! | Attribute        | UUID     | Perms / Props        |
//! |------------------|----------|----------------------|
//! | Hall service     | `0xFF03` | primary              |
//! | Hall state       | `0xFF04` | Read, Read+Notify    |
//! | CCC descriptor   | `0x2902` | Read+Write           |
//!
//! The hall state value is one ASCII byte, `'1'` (magnet present) or `'0'`.
//! Reads are answered from the published state; the GATT table itself
//! holds no value.

use log::info;
#[cfg(not(target_os = "espidf"))]
use log::warn;

use crate::app::ports::{AdvertisingParams, Attribute, LinkPort, RadioPort};
use crate::error::LinkError;
use crate::link::ConnHandle;

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

pub const SERVICE_UUID16: u16 = 0xFF03;
pub const CHAR_HALL_STATE_UUID16: u16 = 0xFF04;
pub const CCC_UUID16: u16 = 0x2902;

/// Service declaration, characteristic declaration, value, CCC.
const SERVICE_NUM_HANDLES: u16 = 4;

/// Hall state value length.
pub const HALL_VALUE_LEN: usize = 1;

/// Legacy advertising payload limit.
pub const ADV_PAYLOAD_MAX: usize = 31;

const AD_TYPE_FLAGS: u8 = 0x01;
const AD_TYPE_COMPLETE_NAME: u8 = 0x09;
/// LE General Discoverable Mode.
const AD_FLAG_GENERAL_DISC: u8 = 0x02;
/// BR/EDR Not Supported.
const AD_FLAG_NO_BREDR: u8 = 0x04;

/// CCC bit for notifications.
const CCC_NOTIFY: u16 = 0x0001;

/// `ESP_ERR_INVALID_STATE`, reported by the simulation for out-of-order use.
#[cfg(not(target_os = "espidf"))]
const ERR_INVALID_STATE: i32 = 0x103;

// ───────────────────────────────────────────────────────────────
// BLE state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BleState {
    Idle,
    /// Stack up and the service registered.
    Ready,
    Advertising,
    Failed,
}

// ───────────────────────────────────────────────────────────────
// Advertising payload
// ───────────────────────────────────────────────────────────────

/// Build the raw advertising payload: flags, then the complete local name.
pub fn build_adv_payload(
    params: &AdvertisingParams<'_>,
) -> Result<heapless::Vec<u8, ADV_PAYLOAD_MAX>, LinkError> {
    let mut flags = AD_FLAG_NO_BREDR;
    if params.discoverable {
        flags |= AD_FLAG_GENERAL_DISC;
    }

    let name = params.name.as_bytes();
    let mut out = heapless::Vec::new();
    out.extend_from_slice(&[2, AD_TYPE_FLAGS, flags])
        .map_err(|_| LinkError::PayloadTooLong)?;
    let name_len = u8::try_from(name.len() + 1).map_err(|_| LinkError::PayloadTooLong)?;
    out.extend_from_slice(&[name_len, AD_TYPE_COMPLETE_NAME])
        .map_err(|_| LinkError::PayloadTooLong)?;
    out.extend_from_slice(name)
        .map_err(|_| LinkError::PayloadTooLong)?;
    Ok(out)
}

/// Whether a CCC value has notifications switched on.
pub const fn notifications_enabled(ccc: u16) -> bool {
    ccc & CCC_NOTIFY != 0
}

fn check_payload(attr: Attribute, payload: &[u8]) -> Result<(), LinkError> {
    match attr {
        Attribute::HallState if payload.len() > HALL_VALUE_LEN => Err(LinkError::PayloadTooLong),
        Attribute::HallState => Ok(()),
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF static state
// ───────────────────────────────────────────────────────────────
//
// Bluedroid callbacks are C function pointers that cannot capture Rust
// closures.  These atomics bridge the callback context to the adapter.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering as AtomicOrdering};

#[cfg(target_os = "espidf")]
static BLE_GATTS_IF: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_SVC_HANDLE: AtomicU16 = AtomicU16::new(0);
#[cfg(target_os = "espidf")]
static BLE_HALL_CHAR_HANDLE: AtomicU16 = AtomicU16::new(0);
#[cfg(target_os = "espidf")]
static BLE_CCC_HANDLE: AtomicU16 = AtomicU16::new(0);
#[cfg(target_os = "espidf")]
static BLE_CCC_VALUE: AtomicU16 = AtomicU16::new(0);

// Advertising parameters, kept for the restart after a disconnect.
#[cfg(target_os = "espidf")]
static ADV_ARMED: AtomicBool = AtomicBool::new(false);
#[cfg(target_os = "espidf")]
static ADV_INT_MIN: AtomicU16 = AtomicU16::new(0);
#[cfg(target_os = "espidf")]
static ADV_INT_MAX: AtomicU16 = AtomicU16::new(0);
#[cfg(target_os = "espidf")]
static ADV_CONNECTABLE: AtomicBool = AtomicBool::new(true);

#[cfg(target_os = "espidf")]
fn uuid16_to_esp(uuid: u16) -> esp_idf_svc::sys::esp_bt_uuid_t {
    // SAFETY: esp_bt_uuid_t is a plain C struct; all-zero is valid.
    let mut t: esp_idf_svc::sys::esp_bt_uuid_t = unsafe { core::mem::zeroed() };
    t.len = 2;
    t.uuid.uuid16 = uuid;
    t
}

/// Start advertising from the stored parameters.  Returns the esp_err_t.
#[cfg(target_os = "espidf")]
unsafe fn start_adv_from_statics() -> i32 {
    use esp_idf_svc::sys::*;
    let adv_type = if ADV_CONNECTABLE.load(AtomicOrdering::Relaxed) {
        esp_ble_adv_type_t_ADV_TYPE_IND
    } else {
        esp_ble_adv_type_t_ADV_TYPE_NONCONN_IND
    };
    let mut adv_params = esp_ble_adv_params_t {
        adv_int_min: ADV_INT_MIN.load(AtomicOrdering::Relaxed),
        adv_int_max: ADV_INT_MAX.load(AtomicOrdering::Relaxed),
        adv_type,
        own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
        channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
        adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
        // SAFETY: remaining fields (peer address) are unused for undirected
        // advertising.
        ..unsafe { core::mem::zeroed() }
    };
    unsafe { esp_ble_gap_start_advertising(&mut adv_params) }
}

/// Answer a read on `handle` with `value`.
#[cfg(target_os = "espidf")]
unsafe fn send_read_response(
    gatts_if: esp_idf_svc::sys::esp_gatt_if_t,
    conn_id: u16,
    trans_id: u32,
    handle: u16,
    value: &[u8],
) {
    use esp_idf_svc::sys::*;
    // SAFETY: esp_gatt_rsp_t is a C union of plain data; all-zero is valid.
    let mut rsp: esp_gatt_rsp_t = unsafe { core::mem::zeroed() };
    unsafe {
        rsp.attr_value.handle = handle;
        rsp.attr_value.len = value.len() as u16;
        rsp.attr_value.value[..value.len()].copy_from_slice(value);
        esp_ble_gatts_send_response(gatts_if, conn_id, trans_id, esp_gatt_status_t_ESP_GATT_OK, &mut rsp);
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gap_event_handler(
    event: esp_idf_svc::sys::esp_gap_ble_cb_event_t,
    param: *mut esp_idf_svc::sys::esp_ble_gap_cb_param_t,
) {
    use esp_idf_svc::sys::*;
    match event {
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_DATA_RAW_SET_COMPLETE_EVT => {
            if ADV_ARMED.load(AtomicOrdering::Relaxed) {
                let ret = unsafe { start_adv_from_statics() };
                if ret != ESP_OK as i32 {
                    log::warn!("BLE GAP: start advertising failed ({})", ret);
                }
            }
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_START_COMPLETE_EVT => {
            let status = unsafe { (*param).adv_start_cmpl.status };
            if status == esp_bt_status_t_ESP_BT_STATUS_SUCCESS {
                log::info!("BLE GAP: advertising started");
            } else {
                log::warn!("BLE GAP: advertising start rejected (status={})", status);
            }
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_STOP_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising stopped");
        }
        _ => {}
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gatts_event_handler(
    event: esp_idf_svc::sys::esp_gatts_cb_event_t,
    gatts_if: esp_idf_svc::sys::esp_gatt_if_t,
    param: *mut esp_idf_svc::sys::esp_ble_gatts_cb_param_t,
) {
    use crate::adapters::log_sink::LogEventSink;
    use crate::drivers::hall::SHARED;
    use esp_idf_svc::sys::*;

    match event {
        esp_gatts_cb_event_t_ESP_GATTS_REG_EVT => {
            BLE_GATTS_IF.store(u32::from(gatts_if), AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: app registered (if={})", gatts_if);
            let mut svc_id = esp_gatt_srvc_id_t {
                id: esp_gatt_id_t {
                    uuid: uuid16_to_esp(SERVICE_UUID16),
                    inst_id: 0,
                },
                is_primary: true,
            };
            unsafe { esp_ble_gatts_create_service(gatts_if, &mut svc_id, SERVICE_NUM_HANDLES) };
        }
        esp_gatts_cb_event_t_ESP_GATTS_CREATE_EVT => {
            let svc_handle = unsafe { (*param).create.service_handle };
            BLE_SVC_HANDLE.store(svc_handle, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: service {:#06x} created (handle={})", SERVICE_UUID16, svc_handle);
            let mut char_uuid = uuid16_to_esp(CHAR_HALL_STATE_UUID16);
            unsafe {
                esp_ble_gatts_start_service(svc_handle);
                esp_ble_gatts_add_char(
                    svc_handle,
                    &mut char_uuid,
                    ESP_GATT_PERM_READ as esp_gatt_perm_t,
                    (ESP_GATT_CHAR_PROP_BIT_READ | ESP_GATT_CHAR_PROP_BIT_NOTIFY) as esp_gatt_char_prop_t,
                    core::ptr::null_mut(),
                    core::ptr::null_mut(),
                );
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_ADD_CHAR_EVT => {
            let handle = unsafe { (*param).add_char.attr_handle };
            BLE_HALL_CHAR_HANDLE.store(handle, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: hall state char (handle={})", handle);
            let mut ccc_uuid = uuid16_to_esp(CCC_UUID16);
            unsafe {
                esp_ble_gatts_add_char_descr(
                    BLE_SVC_HANDLE.load(AtomicOrdering::Relaxed),
                    &mut ccc_uuid,
                    (ESP_GATT_PERM_READ | ESP_GATT_PERM_WRITE) as esp_gatt_perm_t,
                    core::ptr::null_mut(),
                    core::ptr::null_mut(),
                );
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_ADD_CHAR_DESCR_EVT => {
            let handle = unsafe { (*param).add_char_descr.attr_handle };
            BLE_CCC_HANDLE.store(handle, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: CCC (handle={}), table registered", handle);
        }
        esp_gatts_cb_event_t_ESP_GATTS_CONNECT_EVT => {
            let p = unsafe { &(*param).connect };
            BLE_CCC_VALUE.store(0, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: client connected (conn_id={})", p.conn_id);
            // Bluedroid only raises CONNECT_EVT for established links.
            SHARED.on_link_up(0, ConnHandle::new(p.conn_id, p.remote_bda), &mut LogEventSink::new());
        }
        esp_gatts_cb_event_t_ESP_GATTS_DISCONNECT_EVT => {
            let p = unsafe { &(*param).disconnect };
            log::info!(
                "BLE GATTS: client disconnected (conn_id={}, reason={:#x})",
                p.conn_id,
                p.reason
            );
            SHARED.on_link_down(p.conn_id, &mut LogEventSink::new());
            BLE_CCC_VALUE.store(0, AtomicOrdering::Relaxed);
            if ADV_ARMED.load(AtomicOrdering::Relaxed) {
                let ret = unsafe { start_adv_from_statics() };
                if ret != ESP_OK as i32 {
                    log::warn!("BLE GATTS: advertising restart failed ({})", ret);
                }
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_READ_EVT => {
            let p = unsafe { &(*param).read };
            if !p.need_rsp {
                return;
            }
            if p.handle == BLE_HALL_CHAR_HANDLE.load(AtomicOrdering::Relaxed) {
                let value = [SHARED.read_payload()];
                unsafe { send_read_response(gatts_if, p.conn_id, p.trans_id, p.handle, &value) };
            } else if p.handle == BLE_CCC_HANDLE.load(AtomicOrdering::Relaxed) {
                let value = BLE_CCC_VALUE.load(AtomicOrdering::Relaxed).to_le_bytes();
                unsafe { send_read_response(gatts_if, p.conn_id, p.trans_id, p.handle, &value) };
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_WRITE_EVT => {
            let p = unsafe { &(*param).write };
            let data = unsafe { core::slice::from_raw_parts(p.value, usize::from(p.len)) };
            let mut status = esp_gatt_status_t_ESP_GATT_WRITE_NOT_PERMIT;
            if p.handle == BLE_CCC_HANDLE.load(AtomicOrdering::Relaxed) && data.len() == 2 {
                let ccc = u16::from_le_bytes([data[0], data[1]]);
                BLE_CCC_VALUE.store(ccc, AtomicOrdering::Relaxed);
                log::info!(
                    "BLE GATTS: notifications {}",
                    if notifications_enabled(ccc) { "on" } else { "off" }
                );
                status = esp_gatt_status_t_ESP_GATT_OK;
            }
            if p.need_rsp {
                unsafe {
                    esp_ble_gatts_send_response(
                        gatts_if,
                        p.conn_id,
                        p.trans_id,
                        status,
                        core::ptr::null_mut(),
                    );
                }
            }
        }
        _ => {}
    }
}

// ───────────────────────────────────────────────────────────────
// BLE adapter
// ───────────────────────────────────────────────────────────────

pub struct BleAdapter {
    state: BleState,
    notifies_sent: u32,
    /// Simulation: whether the peer has written the CCC.
    #[cfg(not(target_os = "espidf"))]
    sim_subscribed: bool,
}

impl BleAdapter {
    pub fn new() -> Self {
        Self {
            state: BleState::Idle,
            notifies_sent: 0,
            #[cfg(not(target_os = "espidf"))]
            sim_subscribed: true,
        }
    }

    pub fn state(&self) -> BleState {
        self.state
    }

    /// Notifications accepted by the stack since boot.
    pub fn notifies_sent(&self) -> u32 {
        self.notifies_sent
    }

    /// Simulation: stand in for a CCC write from the peer.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_subscribed(&mut self, on: bool) {
        self.sim_subscribed = on;
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_enable(&mut self) -> Result<(), LinkError> {
        use esp_idf_svc::sys::*;

        let check = |ret: i32, what: &str| {
            if ret == ESP_OK as i32 {
                Ok(())
            } else {
                log::error!("BLE: {} failed ({})", what, ret);
                Err(LinkError::StackInitFailed(ret))
            }
        };

        // SAFETY: called once from the boot path before any BLE callback can
        // fire; the handlers only touch atomics and the shared state.
        unsafe {
            // BLE-only: hand the classic BT memory back to the heap.
            esp_bt_controller_mem_release(esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT);

            let mut bt_cfg = esp_bt_controller_config_t::default();
            check(esp_bt_controller_init(&mut bt_cfg), "bt_controller_init")?;
            check(esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_BLE), "bt_controller_enable")?;
            check(esp_bluedroid_init(), "bluedroid_init")?;
            check(esp_bluedroid_enable(), "bluedroid_enable")?;
            check(esp_ble_gap_register_callback(Some(ble_gap_event_handler)), "gap_register_callback")?;
            check(
                esp_ble_gatts_register_callback(Some(ble_gatts_event_handler)),
                "gatts_register_callback",
            )?;
            check(esp_ble_gatts_app_register(0), "gatts_app_register")?;
        }
        info!("BLE(espidf): Bluedroid up, registering service {:#06x}", SERVICE_UUID16);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_enable(&mut self) -> Result<(), LinkError> {
        info!("BLE(sim): stack up, service {:#06x} registered", SERVICE_UUID16);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_advertise(
        &mut self,
        params: &AdvertisingParams<'_>,
        payload: &[u8],
    ) -> Result<(), LinkError> {
        use esp_idf_svc::sys::*;

        ADV_INT_MIN.store(params.interval_min, AtomicOrdering::Relaxed);
        ADV_INT_MAX.store(params.interval_max, AtomicOrdering::Relaxed);
        ADV_CONNECTABLE.store(params.connectable, AtomicOrdering::Relaxed);
        ADV_ARMED.store(true, AtomicOrdering::Relaxed);

        let mut name: heapless::Vec<u8, 32> = heapless::Vec::new();
        name.extend_from_slice(params.name.as_bytes())
            .map_err(|_| LinkError::PayloadTooLong)?;
        name.push(0).map_err(|_| LinkError::PayloadTooLong)?;

        // SAFETY: both buffers outlive the calls, which copy them.
        // Advertising starts from the GAP handler once the raw data is set.
        unsafe {
            esp_ble_gap_set_device_name(name.as_ptr() as *const _);
            let ret = esp_ble_gap_config_adv_data_raw(payload.as_ptr() as *mut u8, payload.len() as u32);
            if ret != ESP_OK as i32 {
                ADV_ARMED.store(false, AtomicOrdering::Relaxed);
                return Err(LinkError::AdvertisingFailed(ret));
            }
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_advertise(
        &mut self,
        params: &AdvertisingParams<'_>,
        payload: &[u8],
    ) -> Result<(), LinkError> {
        info!(
            "BLE(sim): advertising '{}' [{}..{}] ({} bytes)",
            params.name,
            params.interval_min,
            params.interval_max,
            payload.len()
        );
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_notify(&mut self, conn: &ConnHandle, payload: &[u8]) -> Result<(), LinkError> {
        use esp_idf_svc::sys::*;

        let handle = BLE_HALL_CHAR_HANDLE.load(AtomicOrdering::Relaxed);
        if handle == 0 {
            return Err(LinkError::AttributeUnavailable);
        }
        if !notifications_enabled(BLE_CCC_VALUE.load(AtomicOrdering::Relaxed)) {
            return Err(LinkError::NotifyFailed(ESP_ERR_INVALID_STATE as i32));
        }
        // SAFETY: the stack copies the payload before returning.
        let ret = unsafe {
            esp_ble_gatts_send_indicate(
                BLE_GATTS_IF.load(AtomicOrdering::Relaxed) as esp_gatt_if_t,
                conn.conn_id(),
                handle,
                payload.len() as u16,
                payload.as_ptr() as *mut u8,
                false,
            )
        };
        if ret != ESP_OK as i32 {
            return Err(LinkError::NotifyFailed(ret));
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_notify(&mut self, conn: &ConnHandle, payload: &[u8]) -> Result<(), LinkError> {
        if !self.sim_subscribed {
            warn!("BLE(sim): conn {} not subscribed", conn.conn_id());
            return Err(LinkError::NotifyFailed(ERR_INVALID_STATE));
        }
        info!("BLE(sim): notify conn {} {:?}", conn.conn_id(), payload);
        Ok(())
    }
}

impl Default for BleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Port implementations
// ───────────────────────────────────────────────────────────────

impl RadioPort for BleAdapter {
    fn enable(&mut self) -> Result<(), LinkError> {
        match self.platform_enable() {
            Ok(()) => {
                self.state = BleState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = BleState::Failed;
                Err(e)
            }
        }
    }

    fn start_advertising(&mut self, params: &AdvertisingParams<'_>) -> Result<(), LinkError> {
        if self.state == BleState::Idle || self.state == BleState::Failed {
            #[cfg(target_os = "espidf")]
            let rc = esp_idf_svc::sys::ESP_ERR_INVALID_STATE as i32;
            #[cfg(not(target_os = "espidf"))]
            let rc = ERR_INVALID_STATE;
            return Err(LinkError::AdvertisingFailed(rc));
        }
        let payload = build_adv_payload(params)?;
        self.platform_advertise(params, &payload)?;
        self.state = BleState::Advertising;
        info!("BLE: advertising as '{}'", params.name);
        Ok(())
    }
}

impl LinkPort for BleAdapter {
    fn notify(&mut self, conn: &ConnHandle, attr: Attribute, payload: &[u8]) -> Result<(), LinkError> {
        check_payload(attr, payload)?;
        if self.state == BleState::Idle || self.state == BleState::Failed {
            return Err(LinkError::AttributeUnavailable);
        }
        self.platform_notify(conn, payload)?;
        self.notifies_sent = self.notifies_sent.wrapping_add(1);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
