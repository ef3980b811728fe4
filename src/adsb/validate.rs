//! Downlink format / length / checksum acceptance

use super::crc;
use super::fields;
use super::types::DownlinkFormat;

/// Outcome of validating one candidate payload. Rejection is routine:
/// most detected preambles are noise false-positives or truncated
/// frames, so it never aborts a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Accepted(u8),
    BadChecksum,
    Rejected,
}

/// Validate a hex payload against the acceptance table:
/// DF 17 needs 28 digits and a zero CRC-24 remainder, DF 20/21 need
/// 28 digits, DF 4/5/11 need 14 digits, everything else is rejected.
pub fn validate(hex: &str) -> Validation {
    let Some(df) = fields::downlink_format(hex) else {
        return Validation::Rejected;
    };

    match (DownlinkFormat::from(df), hex.len()) {
        (DownlinkFormat::ExtendedSquitter, 28) => match fields::frame_bytes(hex) {
            Some(frame) if crc::checksum(&frame) == 0 => Validation::Accepted(df),
            Some(_) => Validation::BadChecksum,
            None => Validation::Rejected,
        },
        (DownlinkFormat::CommBAltitude | DownlinkFormat::CommBIdentity, 28) => {
            Validation::Accepted(df)
        }
        (
            DownlinkFormat::AltitudeReply
            | DownlinkFormat::IdentityReply
            | DownlinkFormat::AllCallReply,
            14,
        ) => Validation::Accepted(df),
        _ => Validation::Rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_df17_valid_crc_accepted() {
        assert_eq!(
            validate("8D4840D6202CC371C32CE0576098"),
            Validation::Accepted(17)
        );
    }

    #[test]
    fn test_df17_invalid_crc_rejected() {
        assert_eq!(
            validate("8D4840D6202CC371C32CE0576099"),
            Validation::BadChecksum
        );
    }

    #[test]
    fn test_df20_df21_accepted_without_crc() {
        assert_eq!(
            validate("A0001838300000000000004A5D32"),
            Validation::Accepted(20)
        );
        assert_eq!(
            validate("A8001838300000000000004A5D32"),
            Validation::Accepted(21)
        );
    }

    #[test]
    fn test_short_formats_accepted() {
        assert_eq!(validate("20001122AB7542"), Validation::Accepted(4));
        assert_eq!(validate("28001122AB7542"), Validation::Accepted(5));
        assert_eq!(validate("5D4840D6A0B1C2"), Validation::Accepted(11));
    }

    #[test]
    fn test_unknown_format_rejected() {
        // DF0, a format outside the acceptance table
        assert_eq!(validate("02E197B2F3F9A1"), Validation::Rejected);
    }

    #[test]
    fn test_wrong_length_rejected() {
        // DF17 truncated to short length
        assert_eq!(validate("8D4840D6202CC3"), Validation::Rejected);
        // DF4 padded to extended length
        assert_eq!(validate("20001122AB754220001122AB7542"), Validation::Rejected);
    }

    #[test]
    fn test_garbage_rejected() {
        assert_eq!(validate(""), Validation::Rejected);
        assert_eq!(validate("Z"), Validation::Rejected);
    }
}
