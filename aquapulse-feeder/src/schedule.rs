use std::fmt;

use time::OffsetDateTime;

use crate::error::FeederError;

/// One dispense slot on the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub hour: u8,
    pub minute: u8,
}

impl Slot {
    pub fn parse(text: &str) -> Result<Self, FeederError> {
        let invalid = || FeederError::InvalidSlot(text.to_string());

        let (hour, minute) = text.split_once(':').ok_or_else(invalid)?;
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;

        if hour > 23 || minute > 59 {
            return Err(invalid());
        }

        Ok(Self { hour, minute })
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Daily dispense schedule. Each slot fires at most once per calendar day,
/// tracked per slot so a second daily slot cannot be starved by the first.
pub struct Schedule {
    slots: Vec<Slot>,
    fired: Vec<Option<(i32, u16)>>,
}

impl Schedule {
    pub fn new(slots: Vec<Slot>) -> Self {
        let fired = vec![None; slots.len()];
        Self { slots, fired }
    }

    pub fn parse(times: &[String]) -> Result<Self, FeederError> {
        let slots = times
            .iter()
            .map(|text| Slot::parse(text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(slots))
    }

    /// The slot due at `now`, if any. Marks the slot as fired for the day.
    pub fn due(&mut self, now: OffsetDateTime) -> Option<Slot> {
        let today = (now.year(), now.ordinal());

        for (i, slot) in self.slots.iter().enumerate() {
            let matches = now.hour() == slot.hour && now.minute() == slot.minute;
            if matches && self.fired[i] != Some(today) {
                self.fired[i] = Some(today);
                return Some(*slot);
            }
        }

        None
    }
}
