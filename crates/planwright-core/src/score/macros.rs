//! Declarative macros shared by the field-based score types.

/// Implements `PartialOrd`, `Add`, `Sub` and `Neg` field by field.
///
/// The constructor must take the fields in declaration order.
macro_rules! impl_score_ops {
    ($type:ident { $($field:ident),+ } => $ctor:ident) => {
        impl PartialOrd for $type {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl std::ops::Add for $type {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                $type::$ctor($(self.$field + other.$field),+)
            }
        }

        impl std::ops::Sub for $type {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                $type::$ctor($(self.$field - other.$field),+)
            }
        }

        impl std::ops::Neg for $type {
            type Output = Self;

            fn neg(self) -> Self {
                $type::$ctor($(-self.$field),+)
            }
        }
    };
}

/// Expands to the `multiply`, `divide` and `abs` methods of a `Score` impl.
macro_rules! impl_score_scale {
    ($type:ident { $($field:ident),+ } => $ctor:ident) => {
        fn multiply(&self, multiplicand: f64) -> Self {
            $type::$ctor($((self.$field as f64 * multiplicand).round() as i64),+)
        }

        fn divide(&self, divisor: f64) -> Self {
            $type::$ctor($((self.$field as f64 / divisor).round() as i64),+)
        }

        fn abs(&self) -> Self {
            $type::$ctor($(self.$field.abs()),+)
        }
    };
}

/// Implements `ParseableScore` for literals shaped like `"-1hard/-20soft"`.
macro_rules! impl_score_parse {
    ($type:ident { $($field:ident => $suffix:literal),+ } => $ctor:ident) => {
        impl $crate::score::ParseableScore for $type {
            fn parse(s: &str) -> Result<Self, $crate::score::ScoreParseError> {
                let s = s.trim();
                let suffixes: &[&str] = &[$($suffix),+];
                let mut parts = s.split('/');
                let mut next_level = |suffix: &str| -> Result<i64, $crate::score::ScoreParseError> {
                    let part = parts.next().map(str::trim).ok_or_else(|| {
                        $crate::score::ScoreParseError::new(format!(
                            "{} literal '{}' needs {} levels separated by '/'",
                            stringify!($type),
                            s,
                            suffixes.len()
                        ))
                    })?;
                    let number = part.strip_suffix(suffix).ok_or_else(|| {
                        $crate::score::ScoreParseError::new(format!(
                            "level '{}' must end with '{}'",
                            part, suffix
                        ))
                    })?;
                    number.parse::<i64>().map_err(|e| {
                        $crate::score::ScoreParseError::new(format!(
                            "invalid {} level '{}': {}",
                            suffix, number, e
                        ))
                    })
                };
                $(let $field = next_level($suffix)?;)+
                drop(next_level);
                if parts.next().is_some() {
                    return Err($crate::score::ScoreParseError::new(format!(
                        "{} literal '{}' has more than {} levels",
                        stringify!($type),
                        s,
                        suffixes.len()
                    )));
                }
                Ok($type::$ctor($($field),+))
            }

            fn to_string_repr(&self) -> String {
                let levels: Vec<String> = vec![$(format!("{}{}", self.$field, $suffix)),+];
                levels.join("/")
            }
        }
    };
}
