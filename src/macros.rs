/// Declares a fieldless enum whose variants map one-to-one onto byte values,
/// along with `from_u8` for decoding and `From<$name> for u8` for encoding.
#[macro_export]
macro_rules! c_like_enum {
    ( $name: ident { $($variant: ident = $value: literal,)* } ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($variant = $value,)+
        }

        impl $name {
            pub fn from_u8(value: u8) -> Option<$name> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }
    };
}
