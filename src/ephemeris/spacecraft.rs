use crate::heliovis_errors::HeliovisError;

/// Body id of Earth in the trajectory service numbering, used to reference
/// Stonyhurst longitudes to the sub-Earth meridian.
pub(crate) const EARTH_BODY_ID: i64 = 399;

/// Resolve an instrument identifier to a trajectory-service body id.
///
/// The registry covers the solar-observing spacecraft this crate is used
/// with; any other platform can be addressed by passing its service body id
/// as a numeric string (e.g. `"-144"`).
///
/// Arguments
/// ---------
/// * `instrument`: case-insensitive spacecraft name or numeric body id
///
/// Return
/// ------
/// * `(body_id, display_name)`, or `UnknownInstrument` when the identifier is
///   neither a known name nor a number.
pub fn resolve_instrument(instrument: &str) -> Result<(i64, String), HeliovisError> {
    let trimmed = instrument.trim();

    if let Ok(id) = trimmed.parse::<i64>() {
        return Ok((id, trimmed.to_string()));
    }

    let (id, name) = match trimmed.to_ascii_lowercase().as_str() {
        "solar orbiter" | "solo" => (-144, "Solar Orbiter"),
        "parker solar probe" | "psp" | "spp" => (-96, "Parker Solar Probe"),
        "stereo-a" | "stereo a" | "stereo ahead" => (-234, "STEREO-A"),
        "stereo-b" | "stereo b" | "stereo behind" => (-235, "STEREO-B"),
        "soho" => (-21, "SOHO"),
        "bepicolombo" | "mpo" => (-121, "BepiColombo"),
        _ => {
            return Err(HeliovisError::UnknownInstrument(trimmed.to_string()));
        }
    };

    Ok((id, name.to_string()))
}
