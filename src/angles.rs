use std::f64::consts::PI;

use crate::constants::{Radian, DPI};

/// Bring an angle into the principal domain `(-π, π]`.
///
/// Angles already inside the domain are returned unchanged (bit for bit), so the
/// function is idempotent. Other values are shifted by the appropriate multiple of 2π.
/// A non-finite input yields NaN.
///
/// Arguments
/// ---------
/// * `angle`: any angle in radians.
///
/// Return
/// ------
/// * The equivalent angle in `(-π, π]`.
pub fn phidomain(angle: Radian) -> Radian {
    if angle > -PI && angle <= PI {
        return angle;
    }

    let wrapped = angle - DPI * ((angle + PI) / DPI).floor();

    // floor() may leave us one ulp outside the half-open interval
    if wrapped <= -PI {
        wrapped + DPI
    } else if wrapped > PI {
        wrapped - DPI
    } else {
        wrapped
    }
}
