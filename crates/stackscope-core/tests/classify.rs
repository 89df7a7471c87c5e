//! Tests for call instruction classifiers

use stackscope_core::classify::{self, CallClassifier, X86CallClassifier, X86Mode};
use stackscope_core::types::Architecture;
use test_case::test_case;

#[test_case(Architecture::X86, &[0xe8, 1, 2, 3, 4], Some(5) ; "x86 call rel32")]
#[test_case(Architecture::X86, &[0xff, 0xd0], Some(2) ; "x86 call eax")]
#[test_case(Architecture::X86, &[0x9a, 1, 2, 3, 4, 5, 6], Some(7) ; "x86 far call")]
#[test_case(Architecture::X86_64, &[0x41, 0xff, 0xd3], Some(3) ; "x86_64 call r11")]
#[test_case(Architecture::X86_64, &[0x3e, 0xff, 0x15, 0, 0, 0, 0], Some(7) ; "x86_64 notrack call")]
#[test_case(Architecture::X86_64, &[0xe9, 0, 0, 0, 0], None ; "x86_64 jmp rel32")]
#[test_case(Architecture::Arm, &[0x10, 0x00, 0x00, 0xeb], Some(4) ; "arm bl")]
#[test_case(Architecture::Arm, &[0x98, 0x47], Some(2) ; "thumb blx r3")]
#[test_case(Architecture::Arm, &[0x1e, 0xff, 0x2f, 0xe1], None ; "arm bx lr")]
#[test_case(Architecture::Arm64, &[0x10, 0x00, 0x00, 0x94], Some(4) ; "arm64 bl")]
#[test_case(Architecture::Arm64, &[0xc0, 0x03, 0x5f, 0xd6], None ; "arm64 ret")]
fn test_builtin_classifiers(architecture: Architecture, bytes: &[u8], expected: Option<usize>)
{
    assert_eq!(classify::for_architecture(architecture).call_length(bytes), expected);
}

#[test_case(Architecture::X86 ; "x86")]
#[test_case(Architecture::X86_64 ; "x86_64")]
#[test_case(Architecture::Arm ; "arm")]
#[test_case(Architecture::Arm64 ; "arm64")]
fn test_call_lengths_stay_within_architecture_bounds(architecture: Architecture)
{
    let classifier = classify::for_architecture(architecture);
    let (min, max) = architecture.call_length_bounds();

    // every two-byte prefix followed by a fixed tail
    for first in 0..=255u8 {
        for second in 0..=255u8 {
            let bytes = [first, second, 0x24, 0x10, 0x00, 0x00, 0x00];
            if let Some(len) = classifier.call_length(&bytes) {
                assert!((min..=max).contains(&len), "{bytes:02x?} classified with length {len}");
            }
        }
    }
}

#[test]
fn test_truncated_encodings_are_rejected()
{
    let classifier = X86CallClassifier::new(X86Mode::Long64);
    let call = [0xff, 0x94, 0x24, 0x10, 0x00, 0x00, 0x00];
    assert_eq!(classifier.call_length(&call), Some(7));
    for len in 0..call.len() {
        assert_eq!(classifier.call_length(&call[..len]), None, "prefix of {len} bytes");
    }
}

#[test]
fn test_trailing_bytes_are_ignored()
{
    let classifier = classify::for_architecture(Architecture::X86_64);
    assert_eq!(classifier.call_length(&[0xff, 0xd0, 0xcc, 0xcc, 0xcc]), Some(2));
}

#[test]
fn test_mode_is_reported()
{
    assert_eq!(X86CallClassifier::new(X86Mode::Protected32).mode(), X86Mode::Protected32);
}
