// SPDX-License-Identifier: Apache-2.0

//! Pure conversions from raw sensor codes to physical units.
//!
//! Nothing in here touches a bus; the drivers call these after the raw
//! code has been read.

/// Converts a bipolar ADC code to volts. Mid-scale maps to 0 V, zero to
/// `-vref / gain`, and full scale to just under `+vref / gain`.
pub fn adc_code_to_voltage(code: u16, width: u8, vref: f32, gain: f32) -> f32 {
    let half_scale = (1u32 << (width - 1)) as f32;
    (code as f32 / half_scale - 1.0) * vref / gain
}

/// Converts an electrochemical cell voltage to a gas concentration in
/// parts per million. The sign of the voltage carries no information.
pub fn voltage_to_ppm(voltage: f32, feedback_ohms: f32, sensitivity: f32) -> f32 {
    (voltage / feedback_ohms / sensitivity).abs()
}

/// Converts a left-aligned 13-bit two's-complement temperature code to
/// degrees Celsius. The shift is arithmetic, so negative temperatures
/// keep their sign.
pub fn raw_to_celsius(raw: u16) -> f32 {
    ((raw as i16) >> 3) as f32 / 16.0
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Scales a photodiode ADC code to lux.
pub fn code_to_lux(code: u16, lux_per_lsb: f32) -> f32 {
    code as f32 * lux_per_lsb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mid_scale_is_zero_volts() {
        assert_eq!(adc_code_to_voltage(0x8000, 16, 1.2, 1.0), 0.0);
    }

    #[test]
    fn zero_code_is_negative_full_scale() {
        assert_eq!(adc_code_to_voltage(0, 16, 1.2, 1.0), -1.2);
    }

    #[test]
    fn top_code_is_just_under_positive_full_scale() {
        let volts = adc_code_to_voltage(0xFFFF, 16, 1.2, 1.0);
        assert!(volts > 0.0 && volts < 1.2);
    }

    #[test]
    fn gain_divides_the_span() {
        assert_eq!(adc_code_to_voltage(0, 16, 1.2, 2.0), -0.6);
    }

    #[test]
    fn ppm_ignores_voltage_sign() {
        let positive = voltage_to_ppm(0.3, 9230.76, 6.5e-9);
        let negative = voltage_to_ppm(-0.3, 9230.76, 6.5e-9);
        assert_eq!(positive, negative);
        assert!(positive > 0.0);
    }

    #[test]
    fn temperature_codes_keep_their_sign() {
        // -0.0625 C is 13-bit code 0x1FFF, left-aligned to 0xFFF8.
        assert_eq!(raw_to_celsius(0xFFF8), -0.0625);
        assert_eq!(raw_to_celsius(0x0000), 0.0);
        assert_eq!(raw_to_celsius(400 << 3), 25.0);
    }

    #[test]
    fn fahrenheit_anchors() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
    }

    #[test]
    fn lux_scales_linearly() {
        assert_eq!(code_to_lux(0, 0.01), 0.0);
        assert_eq!(code_to_lux(1000, 0.01), 10.0);
    }
}
