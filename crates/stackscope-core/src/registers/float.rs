//! Classification of IEEE-754 and x87 floating-point bit patterns.
//!
//! Register views use this to label a raw vector lane or x87 stack slot
//! without converting it to a host float first (which would quietly turn a
//! signalling NaN into a quiet one).

/// Class of a floating-point bit pattern; the sign is not part of the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatClass
{
    /// Positive or negative zero
    Zero,
    /// Normalised finite value
    Normal,
    /// Positive or negative infinity
    Infinity,
    /// Subnormal (denormal) value
    Denormal,
    /// x87 pseudo-denormal: zero exponent with the explicit integer bit set
    PseudoDenormal,
    /// Quiet NaN
    QNaN,
    /// Signalling NaN
    SNaN,
    /// x87 encoding the FPU rejects (unnormals, pseudo-NaNs, pseudo-infinities)
    Unsupported,
}

/// Classify a 32-bit single-precision bit pattern.
///
/// ```rust
/// use stackscope_core::registers::float::{classify_f32, FloatClass};
///
/// assert_eq!(classify_f32(1.5f32.to_bits()), FloatClass::Normal);
/// assert_eq!(classify_f32(0x7fa0_0000), FloatClass::SNaN);
/// ```
pub fn classify_f32(bits: u32) -> FloatClass
{
    classify_ieee(u64::from(bits), 23, 8)
}

/// Classify a 64-bit double-precision bit pattern.
pub fn classify_f64(bits: u64) -> FloatClass
{
    classify_ieee(bits, 52, 11)
}

fn classify_ieee(bits: u64, mantissa_bits: u32, exponent_bits: u32) -> FloatClass
{
    let mantissa_mask = (1u64 << mantissa_bits) - 1;
    let exponent_max = (1u64 << exponent_bits) - 1;
    let exponent = (bits >> mantissa_bits) & exponent_max;
    let mantissa = bits & mantissa_mask;
    let quiet_bit = 1u64 << (mantissa_bits - 1);

    match (exponent, mantissa) {
        (0, 0) => FloatClass::Zero,
        (0, _) => FloatClass::Denormal,
        (e, 0) if e == exponent_max => FloatClass::Infinity,
        (e, m) if e == exponent_max => {
            if m & quiet_bit != 0 {
                FloatClass::QNaN
            } else {
                FloatClass::SNaN
            }
        }
        _ => FloatClass::Normal,
    }
}

/// Classify an 80-bit x87 extended-precision value stored little-endian
/// (64-bit significand followed by the sign/exponent word).
///
/// ```rust
/// use stackscope_core::registers::float::{classify_x87, FloatClass};
///
/// // 1.0: exponent 0x3fff, integer bit set
/// let one = [0, 0, 0, 0, 0, 0, 0, 0x80, 0xff, 0x3f];
/// assert_eq!(classify_x87(&one), FloatClass::Normal);
/// ```
pub fn classify_x87(bytes: &[u8; 10]) -> FloatClass
{
    let mut significand_bytes = [0u8; 8];
    significand_bytes.copy_from_slice(&bytes[..8]);
    let significand = u64::from_le_bytes(significand_bytes);
    let exponent = u16::from_le_bytes([bytes[8], bytes[9]]) & 0x7fff;

    let integer_bit = significand >> 63 != 0;
    let fraction = significand & !(1u64 << 63);

    match exponent {
        0 if integer_bit => FloatClass::PseudoDenormal,
        0 if fraction == 0 => FloatClass::Zero,
        0 => FloatClass::Denormal,
        0x7fff if !integer_bit => FloatClass::Unsupported,
        0x7fff if fraction == 0 => FloatClass::Infinity,
        0x7fff if fraction & (1u64 << 62) != 0 => FloatClass::QNaN,
        0x7fff => FloatClass::SNaN,
        _ if !integer_bit => FloatClass::Unsupported,
        _ => FloatClass::Normal,
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_f32_classes()
    {
        assert_eq!(classify_f32(0.0f32.to_bits()), FloatClass::Zero);
        assert_eq!(classify_f32((-0.0f32).to_bits()), FloatClass::Zero);
        assert_eq!(classify_f32(f32::MIN_POSITIVE.to_bits()), FloatClass::Normal);
        assert_eq!(classify_f32(1), FloatClass::Denormal);
        assert_eq!(classify_f32(f32::NEG_INFINITY.to_bits()), FloatClass::Infinity);
        assert_eq!(classify_f32(0x7fc0_0000), FloatClass::QNaN);
        assert_eq!(classify_f32(0xff80_0001), FloatClass::SNaN);
    }

    #[test]
    fn test_f64_classes()
    {
        assert_eq!(classify_f64(0.0f64.to_bits()), FloatClass::Zero);
        assert_eq!(classify_f64(std::f64::consts::PI.to_bits()), FloatClass::Normal);
        assert_eq!(classify_f64(0x000f_ffff_ffff_ffff), FloatClass::Denormal);
        assert_eq!(classify_f64(f64::INFINITY.to_bits()), FloatClass::Infinity);
        assert_eq!(classify_f64(0x7ff8_0000_0000_0000), FloatClass::QNaN);
        assert_eq!(classify_f64(0x7ff0_0000_0000_0001), FloatClass::SNaN);
    }

    fn x87(exponent: u16, significand: u64) -> [u8; 10]
    {
        let mut bytes = [0u8; 10];
        bytes[..8].copy_from_slice(&significand.to_le_bytes());
        bytes[8..].copy_from_slice(&exponent.to_le_bytes());
        bytes
    }

    #[test]
    fn test_x87_classes()
    {
        assert_eq!(classify_x87(&x87(0, 0)), FloatClass::Zero);
        assert_eq!(classify_x87(&x87(0x8000, 0)), FloatClass::Zero);
        assert_eq!(classify_x87(&x87(0, 1)), FloatClass::Denormal);
        assert_eq!(classify_x87(&x87(0, 1 << 63)), FloatClass::PseudoDenormal);
        assert_eq!(classify_x87(&x87(0x4000, 1 << 63)), FloatClass::Normal);
        assert_eq!(classify_x87(&x87(0x4000, 1 << 62)), FloatClass::Unsupported);
        assert_eq!(classify_x87(&x87(0x7fff, 1 << 63)), FloatClass::Infinity);
        assert_eq!(classify_x87(&x87(0x7fff, 3 << 62)), FloatClass::QNaN);
        assert_eq!(classify_x87(&x87(0x7fff, (1 << 63) | 1)), FloatClass::SNaN);
        assert_eq!(classify_x87(&x87(0x7fff, 1)), FloatClass::Unsupported);
    }
}
