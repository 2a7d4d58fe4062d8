use crate::core::BatchConfig;
use crate::utils::{ConverterResult, ValidationError};

/// Validates a quality value: finite and within `[0.0, 1.0]`.
pub fn validate_quality(quality: f32) -> ConverterResult<()> {
    if !quality.is_finite() || !(0.0..=1.0).contains(&quality) {
        return Err(ValidationError::Quality(quality).into());
    }
    Ok(())
}

/// Validates a whole batch configuration, e.g. one loaded from a settings file.
pub fn validate_config(config: &BatchConfig) -> ConverterResult<()> {
    validate_quality(config.quality)
}

/// Maps the UI's 0-100 percentage slider onto the `[0.0, 1.0]` quality scale.
pub fn quality_from_percent(percent: u8) -> ConverterResult<f32> {
    if percent > 100 {
        return Err(ValidationError::settings(format!(
            "Quality percentage {percent} is above 100"
        ))
        .into());
    }
    Ok(f32::from(percent) / 100.0)
}
