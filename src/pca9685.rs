//! PCA9685 16-channel, 12-bit PWM controller over I2C
//!
//! Only the first three channels are driven, as red, green and blue.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::OutputDriver;
use crate::color::Duty;

/// Default bus address with all address pins low
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Internal oscillator frequency
const OSCILLATOR_HZ: f32 = 25_000_000.0;

const MODE1: u8 = 0x00;
const MODE2: u8 = 0x01;
const LED0_ON_L: u8 = 0x06;
const ALL_LED_ON_L: u8 = 0xFA;
const ALL_LED_ON_H: u8 = 0xFB;
const ALL_LED_OFF_L: u8 = 0xFC;
const ALL_LED_OFF_H: u8 = 0xFD;
const PRESCALE: u8 = 0xFE;

const MODE1_RESTART: u8 = 0x80;
const MODE1_AUTO_INCREMENT: u8 = 0x20;
const MODE1_SLEEP: u8 = 0x10;
const MODE1_ALLCALL: u8 = 0x01;
const MODE2_OUTDRV: u8 = 0x04;

/// Bit 4 of the `*_H` registers forces a channel fully on or off
const FULL_BIT: u8 = 0x10;

const COUNTER_MAX: u16 = 4095;

/// Oscillator wake-up time after leaving sleep
const WAKE_DELAY_US: u32 = 500;

/// PWM driver for the RGB channels
pub struct Pca9685<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Pca9685<I2C, D> {
    /// Reset the chip into totem-pole output mode with every channel off
    pub fn new(i2c: I2C, delay: D, address: u8) -> Result<Self, I2C::Error> {
        let mut driver = Self {
            i2c,
            delay,
            address,
        };
        driver.set_all_off()?;
        driver.write_register(MODE2, MODE2_OUTDRV)?;
        driver.write_register(MODE1, MODE1_ALLCALL | MODE1_AUTO_INCREMENT)?;
        driver.delay.delay_us(WAKE_DELAY_US);
        Ok(driver)
    }

    /// Set the PWM frequency of all channels.
    ///
    /// The prescaler can only be written while the oscillator sleeps.
    pub fn set_frequency(&mut self, hz: u16) -> Result<(), I2C::Error> {
        let prescale = prescale_for(hz);
        let old_mode = self.read_register(MODE1)?;
        let sleep_mode = (old_mode & !MODE1_RESTART) | MODE1_SLEEP;
        self.write_register(MODE1, sleep_mode)?;
        self.write_register(PRESCALE, prescale)?;
        self.write_register(MODE1, old_mode)?;
        self.delay.delay_us(WAKE_DELAY_US);
        self.write_register(MODE1, old_mode | MODE1_RESTART)
    }

    /// Write the duty values of the first three channels in one transfer
    pub fn set_channels(&mut self, duty: Duty) -> Result<(), I2C::Error> {
        let mut buffer = [0u8; 13];
        buffer[0] = LED0_ON_L;
        for (chunk, value) in buffer[1..].chunks_exact_mut(4).zip([duty.r, duty.g, duty.b]) {
            chunk.copy_from_slice(&channel_registers(value));
        }
        self.i2c.write(self.address, &buffer)
    }

    /// Force every channel fully off.
    ///
    /// Registers are written one by one, auto-increment is still clear after
    /// power-up.
    pub fn set_all_off(&mut self) -> Result<(), I2C::Error> {
        for (register, value) in [
            (ALL_LED_ON_L, 0),
            (ALL_LED_ON_H, 0),
            (ALL_LED_OFF_L, 0),
            (ALL_LED_OFF_H, FULL_BIT),
        ] {
            self.write_register(register, value)?;
        }
        Ok(())
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[register, value])
    }

    fn read_register(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut value = [0u8];
        self.i2c.write_read(self.address, &[register], &mut value)?;
        Ok(value[0])
    }
}

impl<I2C: I2c, D: DelayNs> OutputDriver for Pca9685<I2C, D> {
    type Error = I2C::Error;

    fn write(&mut self, duty: Duty) -> Result<(), Self::Error> {
        self.set_channels(duty)
    }
}

/// Prescaler register value for a PWM frequency
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless
)]
pub fn prescale_for(hz: u16) -> u8 {
    let hz = f32::from(hz.max(1));
    let prescale = libm::roundf(OSCILLATOR_HZ / 4096.0 / hz) - 1.0;
    // Hardware limits: 3 (1526 Hz) to 255 (24 Hz)
    prescale.clamp(3.0, 255.0) as u8
}

/// `ON_L, ON_H, OFF_L, OFF_H` for a duty value.
///
/// The output turns on at count 0 and off at `value`. Zero and full scale use
/// the dedicated full-off and full-on bits to avoid a glitch pulse.
pub fn channel_registers(value: u16) -> [u8; 4] {
    match value {
        0 => [0, 0, 0, FULL_BIT],
        v if v >= COUNTER_MAX => [0, FULL_BIT, 0, 0],
        v => {
            let [low, high] = v.to_le_bytes();
            [0, 0, low, high]
        }
    }
}
