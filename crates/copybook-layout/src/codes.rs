//! Code-string enumeration boilerplate.
//!
//! Layout files spell enumerated settings as short code strings
//! (`right`, `padding`, `upper`). This macro generates the enum, the
//! case-insensitive `parse`, the canonical `code`, `Display`, and the
//! serde impls from one definition table.

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Parse a configuration code, case-insensitively.
            pub fn parse(code: &str) -> Option<Self> {
                $( if code.eq_ignore_ascii_case($code) {
                    return Some(Self::$variant);
                } )+
                None
            }

            /// The canonical configuration code.
            pub fn code(&self) -> &'static str {
                match self {
                    $( Self::$variant => $code, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.code())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        concat!("unknown ", stringify!($name), " code '{}'"),
                        s
                    ))
                })
            }
        }
    };
}

pub(crate) use code_enum;
