//! Leveled assertions. Cheap checks are always on; the more expensive ones are enabled when the
//! crate is tested or compiled with the `debug-checks` feature.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const CINCH_ASSERT_LEVEL_DEFINITION: u8 = CINCH_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const CINCH_ASSERT_LEVEL_DEFINITION: u8 = CINCH_ASSERT_ADVANCED;

pub const CINCH_ASSERT_SIMPLE: u8 = 1;
pub const CINCH_ASSERT_MODERATE: u8 = 2;
pub const CINCH_ASSERT_ADVANCED: u8 = 3;

#[macro_export]
#[doc(hidden)]
macro_rules! cinch_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::CINCH_ASSERT_LEVEL_DEFINITION >= $crate::asserts::CINCH_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! cinch_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::CINCH_ASSERT_LEVEL_DEFINITION >= $crate::asserts::CINCH_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! cinch_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::CINCH_ASSERT_LEVEL_DEFINITION >= $crate::asserts::CINCH_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! cinch_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::CINCH_ASSERT_LEVEL_DEFINITION >= $crate::asserts::CINCH_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}
