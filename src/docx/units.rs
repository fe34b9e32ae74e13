//! Unit conversions for OOXML emission.
//!
//! Word measures paragraph and table geometry in twips (twentieths of a
//! point) and drawing geometry in EMU (English Metric Units, 12700 per
//! point). Every conversion rounds to the nearest integer independently;
//! no running remainder is carried between fields.

/// Convert points to twips (1 pt = 20 twips).
pub fn pt_to_twips(pt: f32) -> i64 {
    (pt * 20.0).round() as i64
}

/// Convert points to EMU (1 pt = 12700 EMU).
pub fn pt_to_emu(pt: f32) -> i64 {
    (pt as f64 * 12700.0).round() as i64
}

/// Convert points to half-points, the unit of `w:sz` font sizes.
pub fn pt_to_half_points(pt: f32) -> i64 {
    (pt * 2.0).round() as i64
}

/// Convert degrees to 60000ths of a degree, the unit of `a:xfrm` rotation.
pub fn degrees_to_xfrm_rot(degrees: f32) -> i64 {
    (degrees as f64 * 60000.0).round() as i64
}

/// Convert points to eighths of a point, the unit of `w:sz` border widths.
pub fn pt_to_eighth_points(pt: f32) -> i64 {
    (pt * 8.0).round() as i64
}
