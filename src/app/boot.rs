//! Boot sequence.
//!
//! Order matters and is fixed:
//!
//! 1. disable unused power regulation
//! 2. indicator outputs off
//! 3. hall pin input + edge interrupt armed
//! 4. initial sample, taken immediately with no settle delay
//! 5. radio bring-up, then advertising only if bring-up succeeded
//!
//! An edge that fires between steps 3 and 4 leaves a wake-up unit pending;
//! the worker re-samples it after boot and the change filter drops it if
//! the level matches the initial sample.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::{info, warn};

use super::events::AppEvent;
use super::ports::{AdvertisingParams, BoardPort, EventSink, RadioPort};
use super::service::HallService;
use super::shared::SharedState;
use crate::config::FirmwareConfig;
use crate::error::{Error, LinkError};
use crate::hall::{DebounceWorker, SensorState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootReport {
    pub initial: SensorState,
    /// `Ok` when advertising is running, otherwise why it was skipped.
    pub advertising: Result<(), LinkError>,
}

pub fn boot<'a, P, D>(
    config: &FirmwareConfig,
    shared: &'a SharedState,
    mut worker: DebounceWorker<P, D>,
    board: &mut impl BoardPort,
    radio: &mut impl RadioPort,
    sink: &mut impl EventSink,
) -> Result<(HallService<'a, P, D>, BootReport), Error>
where
    P: InputPin,
    D: DelayNs,
{
    config.validate().map_err(Error::Config)?;

    board.disable_power_regulation();
    if let Err(e) = board.indicators_off() {
        warn!("boot: indicator init failed ({}), continuing", e);
    }
    board.configure_hall_interrupt()?;

    let initial = worker.sample_initial()?;
    info!("boot: initial hall sample {:?} ('{}')", initial, char::from(initial.payload()));
    let service = HallService::new(shared, worker, initial);
    sink.emit(&AppEvent::Booted { initial });

    let advertising = start_radio(config, radio);
    match advertising {
        Ok(()) => sink.emit(&AppEvent::AdvertisingStarted),
        Err(e) => sink.emit(&AppEvent::AdvertisingSkipped(e)),
    }

    Ok((service, BootReport { initial, advertising }))
}

fn start_radio(config: &FirmwareConfig, radio: &mut impl RadioPort) -> Result<(), LinkError> {
    if let Err(e) = radio.enable() {
        warn!("boot: radio bring-up failed ({}), not advertising", e);
        return Err(e);
    }
    let params = AdvertisingParams {
        name: config.device_name.as_str(),
        interval_min: config.adv_interval_min,
        interval_max: config.adv_interval_max,
        connectable: true,
        discoverable: true,
    };
    radio.start_advertising(&params).inspect_err(|e| {
        warn!("boot: advertising failed ({})", e);
    })?;
    info!("boot: advertising as '{}'", params.name);
    Ok(())
}
