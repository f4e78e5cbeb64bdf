use core::fmt;

macro_rules! protocol_versions {
    ($($variant:ident => $protocol:literal, $name:literal;)+) => {
        /// A protocol version announced in a handshake.
        ///
        /// Numbers missing from the table are kept as [`ProtocolVersion::Unknown`].
        #[allow(non_camel_case_types, reason = "variants mirror release names")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ProtocolVersion {
            $($variant,)+
            Unknown(i32),
        }

        impl ProtocolVersion {
            /// Every version in the table, oldest first.
            pub const KNOWN: &[ProtocolVersion] = &[$(ProtocolVersion::$variant,)+];

            #[must_use]
            pub const fn from_protocol(protocol: i32) -> Self {
                match protocol {
                    $($protocol => Self::$variant,)+
                    other => Self::Unknown(other),
                }
            }

            #[must_use]
            pub const fn protocol(self) -> i32 {
                match self {
                    $(Self::$variant => $protocol,)+
                    Self::Unknown(protocol) => protocol,
                }
            }

            /// Release name of the version, `None` when unknown.
            #[must_use]
            pub const fn name(self) -> Option<&'static str> {
                match self {
                    $(Self::$variant => Some($name),)+
                    Self::Unknown(_) => None,
                }
            }
        }
    };
}

protocol_versions! {
    V1_7_2 => 4, "1.7.2";
    V1_7_6 => 5, "1.7.6";
    V1_8 => 47, "1.8";
    V1_9 => 107, "1.9";
    V1_9_4 => 110, "1.9.4";
    V1_10 => 210, "1.10";
    V1_11 => 315, "1.11";
    V1_11_1 => 316, "1.11.1";
    V1_12 => 335, "1.12";
    V1_12_1 => 338, "1.12.1";
    V1_12_2 => 340, "1.12.2";
    V1_13 => 393, "1.13";
    V1_13_1 => 401, "1.13.1";
    V1_13_2 => 404, "1.13.2";
    V1_14 => 477, "1.14";
    V1_14_4 => 498, "1.14.4";
    V1_15 => 573, "1.15";
    V1_15_2 => 578, "1.15.2";
    V1_16 => 735, "1.16";
    V1_16_1 => 736, "1.16.1";
    V1_16_2 => 751, "1.16.2";
    V1_16_3 => 753, "1.16.3";
    V1_16_4 => 754, "1.16.4";
    V1_17 => 755, "1.17";
    V1_17_1 => 756, "1.17.1";
    V1_18 => 757, "1.18";
    V1_18_2 => 758, "1.18.2";
    V1_19 => 759, "1.19";
    V1_19_1 => 760, "1.19.1";
    V1_19_3 => 761, "1.19.3";
    V1_19_4 => 762, "1.19.4";
    V1_20 => 763, "1.20";
    V1_20_2 => 764, "1.20.2";
    V1_20_3 => 765, "1.20.3";
    V1_20_5 => 766, "1.20.5";
    V1_21 => 767, "1.21";
    V1_21_2 => 768, "1.21.2";
    V1_21_4 => 769, "1.21.4";
    V1_21_5 => 770, "1.21.5";
    V1_21_6 => 771, "1.21.6";
    V1_21_7 => 772, "1.21.7";
}

impl ProtocolVersion {
    pub const OLDEST: Self = Self::V1_7_2;
    pub const LATEST: Self = Self::V1_21_7;

    #[must_use]
    pub const fn is_known(self) -> bool { !matches!(self, Self::Unknown(_)) }
}

impl From<i32> for ProtocolVersion {
    fn from(protocol: i32) -> Self { Self::from_protocol(protocol) }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({})", self.protocol()),
            None => write!(f, "unknown ({})", self.protocol()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_known_version() {
        assert_eq!(ProtocolVersion::from_protocol(47), ProtocolVersion::V1_8);
        assert_eq!(ProtocolVersion::from_protocol(772), ProtocolVersion::LATEST);
        assert_eq!(ProtocolVersion::LATEST.to_string(), "1.21.7 (772)");
    }

    #[test]
    fn keep_unknown_version() {
        let version = ProtocolVersion::from_protocol(9999);
        assert_eq!(version, ProtocolVersion::Unknown(9999));
        assert_eq!(version.protocol(), 9999);
        assert!(!version.is_known());
        assert_eq!(version.to_string(), "unknown (9999)");
    }

    #[test]
    fn table_round_trips() {
        for version in ProtocolVersion::KNOWN {
            assert_eq!(ProtocolVersion::from_protocol(version.protocol()), *version);
        }
    }

    #[test]
    fn table_is_ordered() {
        assert!(
            ProtocolVersion::KNOWN
                .windows(2)
                .all(|pair| pair[0].protocol() < pair[1].protocol())
        );
        assert_eq!(ProtocolVersion::KNOWN.first(), Some(&ProtocolVersion::OLDEST));
        assert_eq!(ProtocolVersion::KNOWN.last(), Some(&ProtocolVersion::LATEST));
    }
}
