#![no_std]
#![no_main]

use core::cell::RefCell;

use bsp::entry;
use defmt::*;
use defmt_rtt as _;
use embedded_hal::delay::DelayNs;
use embedded_hal_bus::i2c::RefCellDevice;
use panic_probe as _;

// Provide an alias for our BSP so we can switch targets quickly.
// Uncomment the BSP you included in Cargo.toml, the rest of the code does not need to change.
use rp_pico as bsp;

use bsp::hal::{
    clocks::{init_clocks_and_plls, Clock},
    fugit::{ExtU32, RateExtU32},
    gpio::{FunctionI2C, PullUp},
    pac,
    watchdog::Watchdog as HalWatchdog,
    Sio, Timer, I2C,
};
use eco2_monitor::bus::scan;
use eco2_monitor::ccs811::{Ccs811, DriveMode};
use eco2_monitor::clock::Seconds;
use eco2_monitor::config::CONFIG;
use eco2_monitor::indicator::{Color, Indicator, RgbLed};
use eco2_monitor::monitor::{Cycle, Monitor, Watchdog};
use eco2_monitor::policy::StatusPolicy;
use eco2_monitor::rendering::render_message;
use eco2_monitor::sensors::Bme280Sensor;
use ssd1306::{prelude::*, I2CDisplayInterface, Ssd1306};

/// RP2040 watchdog behind the monitor's feed interface
struct BoardWatchdog(HalWatchdog);

impl Watchdog for BoardWatchdog {
    fn feed(&mut self) {
        self.0.feed();
    }
}

#[entry]
fn main() -> ! {
    info!("eCO2 Monitor Starting");
    // Grab our singleton objects
    let mut pac = pac::Peripherals::take().unwrap();

    // Set up the watchdog driver - needed by the clock setup code
    let mut watchdog = HalWatchdog::new(pac.WATCHDOG);

    // Configure the clocks
    //
    // The default is to generate a 125 MHz system clock
    let clocks = init_clocks_and_plls(
        bsp::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    // Armed before bring-up so a peripheral that hangs the bus also ends in a reset
    watchdog.pause_on_debug(true);
    watchdog.start((CONFIG.timing.watchdog_timeout_ms * 1000).micros());

    // The single-cycle I/O block controls our GPIO pins
    let sio = Sio::new(pac.SIO);

    // Set the pins up according to their function on this particular board
    let pins = bsp::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    // Set up RGB LED, white while initializing
    let mut led = RgbLed::new(
        pins.gpio2.into_push_pull_output(),
        pins.gpio3.into_push_pull_output(),
        pins.gpio4.into_push_pull_output(),
    );
    // GPIO writes are infallible
    let _ = led.set_color(Color::WHITE);

    // Set up the shared I2C0 bus
    let i2c = I2C::i2c0(
        pac.I2C0,
        pins.gpio16.reconfigure::<FunctionI2C, PullUp>(),
        pins.gpio17.reconfigure::<FunctionI2C, PullUp>(),
        CONFIG.bus.frequency_hz.Hz(),
        &mut pac.RESETS,
        clocks.system_clock.freq(),
    );
    let bus = RefCell::new(i2c);

    // Set up SSD1306
    let interface = I2CDisplayInterface::new_custom_address(
        RefCellDevice::new(&bus),
        CONFIG.bus.display_address,
    );
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    if let Err(e) = display.init() {
        halt("Display init failed", Debug2Format(&e));
    }
    if let Err(e) = render_message("Initializing...", &mut display) {
        halt("Display write failed", Debug2Format(&e));
    }
    settle(&mut timer, &watchdog);

    let devices = scan(&mut RefCellDevice::new(&bus));
    info!("I2C scan found {} devices", devices.len());

    // Set up BME280
    let bme = match Bme280Sensor::init(
        RefCellDevice::new(&bus),
        timer,
        CONFIG.bus.atmo_address,
    ) {
        Ok(bme) => bme,
        Err(e) => halt("BME280 init failed", Debug2Format(&e)),
    };
    settle(&mut timer, &watchdog);

    // Set up CCS811
    let mut ccs = Ccs811::new(RefCellDevice::new(&bus), CONFIG.bus.gas_address);
    if let Err(e) = ccs.start(&mut timer, DriveMode::EverySecond) {
        halt("CCS811 init failed", Debug2Format(&e));
    }
    settle(&mut timer, &watchdog);

    let mut monitor = Monitor::new(
        ccs,
        bme,
        display,
        led,
        BoardWatchdog(watchdog),
        StatusPolicy::new(CONFIG.policy),
        now(&timer),
    );

    info!("eCO2 Monitor Ready");

    loop {
        match monitor.poll(now(&timer)) {
            Ok(Cycle::Measured(report)) => {
                debug!("{} after {}s", report.status.level, report.runtime);
            }
            Ok(Cycle::NotReady) => {}
            Err(e) => halt("Poll failed", e),
        }
        timer.delay_ms(CONFIG.timing.poll_interval_ms);
    }
}

/// Seconds since the timer started counting at power-on
fn now(timer: &Timer) -> Seconds {
    (timer.get_counter().ticks() / 1_000_000) as Seconds
}

/// Lets a freshly configured peripheral settle, keeping the watchdog fed
fn settle(timer: &mut Timer, watchdog: &HalWatchdog) {
    watchdog.feed();
    timer.delay_ms(CONFIG.timing.settle_ms);
    watchdog.feed();
}

/// Stops feeding the watchdog so the board restarts
/// param reason: what failed
/// param detail: underlying driver error
fn halt<T: Format>(reason: &str, detail: T) -> ! {
    error!("{}: {}; waiting for watchdog reset", reason, detail);
    loop {
        cortex_m::asm::wfi();
    }
}
