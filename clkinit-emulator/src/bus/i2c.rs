use clkinit_core::bus::{split_address_byte, BusStatus};

use super::{device::I2CDevice, BusController};

/// The number of half clock periods taken by a START or STOP condition.
const CONDITION_HALF_PERIODS: u64 = 2;
/// The number of half clock periods taken by an octet and its acknowledge bit.
const BYTE_HALF_PERIODS: u64 = 18;
/// The number of events kept by [`I2CMasterEmulator::events`].
pub const MAX_EVENTS: usize = 4096;

/// How long a bus request keeps the controller busy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Latency {
    /// Derived from the configured clock width, which is the number of ticks per half clock period.
    #[default]
    ClockWidth,
    /// A fixed number of ticks for every request.
    Fixed(u32),
}

/// A condition or octet observed on the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusEvent {
    /// START condition.
    Start,
    /// An octet and whether it was acknowledged.
    Write {
        /// The octet.
        byte: u8,
        /// Whether a device acknowledged it.
        ack: bool,
    },
    /// STOP condition.
    Stop,
}

impl std::fmt::Display for BusEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "START"),
            Self::Write { byte, ack: true } => write!(f, "WRITE({byte:#04X}, ACK)"),
            Self::Write { byte, ack: false } => write!(f, "WRITE({byte:#04X}, NACK)"),
            Self::Stop => write!(f, "STOP"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transaction {
    Idle,
    AddressPhase,
    Addressed(usize),
    NotAddressed,
}

/// An emulated I2C master with the devices attached to its bus.
///
/// Devices can sit on the root segment or behind a channel of an I2C switch on the root segment.
pub struct I2CMasterEmulator {
    latency: Latency,
    clock_width: u32,
    remaining: u64,
    acked: bool,
    pending_ack: Option<bool>,
    broken: bool,
    transaction: Transaction,
    devices: Vec<(Box<dyn I2CDevice>, Option<u8>)>,
    events: Vec<BusEvent>,
    overlapped_requests: usize,
}

impl I2CMasterEmulator {
    /// Creates a new controller with no devices attached.
    #[must_use]
    pub fn new(latency: Latency) -> Self {
        Self {
            latency,
            clock_width: 0,
            remaining: 0,
            acked: false,
            pending_ack: None,
            broken: false,
            transaction: Transaction::Idle,
            devices: Vec::new(),
            events: Vec::new(),
            overlapped_requests: 0,
        }
    }

    /// Attaches `device` to the root segment, or behind the switch channel `channel`.
    #[must_use]
    pub fn attach<D: I2CDevice>(mut self, device: D, channel: Option<u8>) -> Self {
        self.devices.push((Box::new(device), channel));
        self
    }

    /// Returns the first attached device of type `D`.
    #[must_use]
    pub fn device<D: I2CDevice>(&self) -> Option<&D> {
        self.devices
            .iter()
            .find_map(|(dev, _)| dev.as_any().downcast_ref::<D>())
    }

    /// Returns the most recent conditions and octets, oldest first.
    ///
    /// Once the log holds [`MAX_EVENTS`] entries, the older half is dropped.
    #[must_use]
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Returns the number of requests issued while the controller was busy.
    #[must_use]
    pub const fn overlapped_requests(&self) -> usize {
        self.overlapped_requests
    }

    /// Returns the latency model.
    #[must_use]
    pub const fn latency(&self) -> Latency {
        self.latency
    }

    /// Makes the controller report [`BusStatus::Busy`] forever.
    pub fn break_down(&mut self) {
        tracing::warn!("I2C bus is stuck");
        self.broken = true;
    }

    /// Undoes [`I2CMasterEmulator::break_down`].
    pub fn repair(&mut self) {
        self.broken = false;
    }

    fn visible_channels(&self) -> u8 {
        self.devices
            .iter()
            .filter(|(_, ch)| ch.is_none())
            .filter_map(|(dev, _)| dev.channels())
            .fold(0, |acc, ch| acc | ch)
    }

    fn visible_devices(&self) -> Vec<usize> {
        let channels = self.visible_channels();
        self.devices
            .iter()
            .enumerate()
            .filter(|(_, (_, ch))| ch.map_or(true, |ch| channels & (1 << ch) != 0))
            .map(|(idx, _)| idx)
            .collect()
    }

    fn request_ticks(&self, half_periods: u64) -> u64 {
        match self.latency {
            Latency::ClockWidth => half_periods * self.clock_width.max(1) as u64,
            Latency::Fixed(ticks) => ticks as u64,
        }
    }

    fn record(&mut self, event: BusEvent) {
        if self.events.len() == MAX_EVENTS {
            self.events.drain(..MAX_EVENTS / 2);
        }
        self.events.push(event);
    }

    fn accept(&mut self) -> bool {
        if self.status() == BusStatus::Busy {
            tracing::error!("I2C request issued while the bus is busy");
            self.overlapped_requests += 1;
            return false;
        }
        true
    }

    fn begin(&mut self, half_periods: u64, ack: Option<bool>) {
        self.remaining = self.request_ticks(half_periods);
        self.pending_ack = ack;
        if self.remaining == 0 {
            self.complete();
        }
    }

    fn complete(&mut self) {
        if let Some(ack) = self.pending_ack.take() {
            self.acked = ack;
        }
    }

    fn transfer(&mut self, byte: u8) -> bool {
        match self.transaction {
            Transaction::Idle => {
                tracing::warn!("Octet {:#04X} written outside of a transaction", byte);
                false
            }
            Transaction::AddressPhase => {
                let (address, read) = split_address_byte(byte);
                let target = self
                    .visible_devices()
                    .into_iter()
                    .find(|&idx| self.devices[idx].0.address() == address);
                let ack = target.is_some_and(|idx| self.devices[idx].0.address_match(read));
                self.transaction = match target {
                    Some(idx) if ack => Transaction::Addressed(idx),
                    _ => {
                        tracing::debug!("No device acknowledged address {:#04X}", address);
                        Transaction::NotAddressed
                    }
                };
                ack
            }
            Transaction::Addressed(idx) => self.devices[idx].0.write(byte),
            Transaction::NotAddressed => false,
        }
    }
}

impl BusController for I2CMasterEmulator {
    fn status(&self) -> BusStatus {
        if self.broken || self.remaining > 0 {
            BusStatus::Busy
        } else {
            BusStatus::Idle
        }
    }

    fn acked(&self) -> bool {
        self.acked
    }

    fn clock_width(&self) -> u32 {
        self.clock_width
    }

    fn configure(&mut self, clock_width: u32) {
        tracing::debug!("I2C clock width: {}", clock_width);
        self.clock_width = clock_width;
    }

    fn start(&mut self) {
        if !self.accept() {
            return;
        }
        self.visible_devices()
            .into_iter()
            .for_each(|idx| self.devices[idx].0.start());
        self.transaction = Transaction::AddressPhase;
        self.record(BusEvent::Start);
        self.begin(CONDITION_HALF_PERIODS, None);
    }

    fn write_byte(&mut self, byte: u8) {
        if !self.accept() {
            return;
        }
        let ack = self.transfer(byte);
        self.record(BusEvent::Write { byte, ack });
        self.begin(BYTE_HALF_PERIODS, Some(ack));
    }

    fn stop(&mut self) {
        if !self.accept() {
            return;
        }
        self.visible_devices()
            .into_iter()
            .for_each(|idx| self.devices[idx].0.stop());
        self.transaction = Transaction::Idle;
        self.record(BusEvent::Stop);
        self.begin(CONDITION_HALF_PERIODS, None);
    }

    fn max_request_ticks(&self) -> u64 {
        self.request_ticks(BYTE_HALF_PERIODS.max(CONDITION_HALF_PERIODS))
    }

    fn update(&mut self) {
        self.devices.iter_mut().for_each(|(dev, _)| dev.update());
        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.complete();
            }
        }
    }
}
