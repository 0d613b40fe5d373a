//! Capacitive touch buttons.
//!
//! Each configured button watches one touch pad. After calibration a pad
//! counts as touched while its filtered reading stays below
//! `baseline * threshold_percent / 100`; every dispatch while touched runs
//! the button's action once, so holding a pad repeats the action at the
//! dispatch interval.

use core::fmt;

/// A logical button slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonId(pub usize);

impl From<usize> for ButtonId {
    fn from(id: usize) -> Self {
        ButtonId(id)
    }
}

/// A hardware touch pad number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pad(pub u8);

/// Trait for abstracting the touch peripheral.
///
/// Readings are expected to be filtered already; lower values mean more
/// capacitance, i.e. a finger on the pad.
pub trait TouchSensor {
    /// Returns the latest filtered reading of `pad`.
    fn read_filtered(&mut self, pad: Pad) -> u16;
}

/// Errors that can occur when configuring buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// The button ID exceeds the number of slots.
    InvalidButton(ButtonId),
}

impl fmt::Display for TouchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TouchError::InvalidButton(id) => write!(f, "button {} does not exist", id.0),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TouchError {}

struct ButtonSlot<C> {
    pad: Pad,
    threshold_percent: u8,
    /// Zero until calibrated, which keeps the button inert.
    threshold: u16,
    action: fn(&mut C),
}

/// A fixed set of touch buttons whose actions run on a context `C`.
///
/// # Type Parameters
/// * `C` - Context type the actions operate on
/// * `N` - Number of button slots
pub struct TouchButtons<C, const N: usize> {
    slots: [Option<ButtonSlot<C>>; N],
    calibrated: bool,
}

impl<C, const N: usize> TouchButtons<C, N> {
    /// Creates a set with every slot unconfigured.
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            calibrated: false,
        }
    }

    /// Binds button `id` to `pad` with a touch threshold and an action.
    ///
    /// A configured button stays inert until the next calibration.
    ///
    /// # Errors
    /// * `InvalidButton` - `id` is outside the slot range
    pub fn configure_input(
        &mut self,
        id: ButtonId,
        pad: Pad,
        threshold_percent: u8,
        action: fn(&mut C),
    ) -> Result<(), TouchError> {
        let slot = self.slots.get_mut(id.0).ok_or(TouchError::InvalidButton(id))?;
        *slot = Some(ButtonSlot {
            pad,
            threshold_percent,
            threshold: 0,
            action,
        });
        Ok(())
    }

    /// Reads the untouched baseline of every configured pad and derives its
    /// threshold.
    pub fn calibrate_thresholds<S: TouchSensor>(&mut self, sensor: &mut S) {
        for (id, slot) in self.slots.iter_mut().enumerate() {
            let Some(slot) = slot else {
                continue;
            };
            let baseline = sensor.read_filtered(slot.pad);
            let threshold = u32::from(baseline) * u32::from(slot.threshold_percent) / 100;
            slot.threshold = u16::try_from(threshold).unwrap_or(u16::MAX);
            debug!(
                "button {} pad {} baseline {} threshold {}",
                id, slot.pad.0, baseline, slot.threshold
            );
        }
        self.calibrated = true;
    }

    /// Runs the action of every button whose pad reads below its threshold.
    ///
    /// Returns the number of actions run.
    pub fn dispatch<S: TouchSensor>(&self, sensor: &mut S, context: &mut C) -> usize {
        let mut fired = 0;
        for (id, slot) in self.slots.iter().enumerate() {
            let Some(slot) = slot else {
                continue;
            };
            if sensor.read_filtered(slot.pad) < slot.threshold {
                debug!("button {} touched", id);
                (slot.action)(context);
                fired += 1;
            }
        }
        fired
    }

    /// Returns true once thresholds have been calibrated.
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Returns true if button `id` is configured.
    pub fn is_configured(&self, id: ButtonId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    /// Calibrated threshold of button `id`, `None` if not configured.
    pub fn threshold(&self, id: ButtonId) -> Option<u16> {
        self.slots.get(id.0)?.as_ref().map(|slot| slot.threshold)
    }
}

impl<C, const N: usize> Default for TouchButtons<C, N> {
    fn default() -> Self {
        Self::new()
    }
}
