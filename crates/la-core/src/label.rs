use core::fmt::{Debug, Display};
use core::hash::Hash;

/// Unsigned integer label stored in a label volume.
pub trait Label: Copy + Ord + Hash + Debug + Display + Send + Sync + 'static {
    /// The "no label" value.
    const BACKGROUND: Self;

    fn is_background(self) -> bool {
        self == Self::BACKGROUND
    }

    fn to_u64(self) -> u64;
}

macro_rules! impl_label {
    ($($t:ty),*) => {
        $(
            impl Label for $t {
                const BACKGROUND: Self = 0;

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_label!(u8, u16, u32, u64);

#[cfg(test)]
mod tests {
    use super::Label;

    #[test]
    fn background_is_zero_for_all_widths() {
        assert!(0u8.is_background());
        assert!(0u16.is_background());
        assert!(0u32.is_background());
        assert!(!7u64.is_background());
    }

    #[test]
    fn widening_preserves_value() {
        assert_eq!(255u8.to_u64(), 255);
        assert_eq!(4999u16.to_u64(), 4999);
        assert_eq!(u32::MAX.to_u64(), u64::from(u32::MAX));
    }
}
