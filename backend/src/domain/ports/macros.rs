//! Helper macro for port error enums.
//!
//! Each variant gets a `thiserror` message and a snake-case constructor
//! whose parameters accept anything convertible into the field type.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use crate::domain::MessId;

    define_port_error! {
        pub enum LedgerPortError {
            Unavailable { message: String } => "ledger unavailable: {message}",
            Stale { expected: u32, actual: u32 } => "stale: expected {expected}, found {actual}",
            Missing { mess_id: MessId } => "mess {mess_id} missing",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = LedgerPortError::unavailable("timeout");
        assert_eq!(err.to_string(), "ledger unavailable: timeout");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = LedgerPortError::stale(2_u32, 3_u32);
        assert_eq!(err.to_string(), "stale: expected 2, found 3");
    }

    #[test]
    fn constructors_accept_domain_identifiers() {
        let mess_id = MessId::random();
        let err = LedgerPortError::missing(mess_id);
        assert_eq!(err.to_string(), format!("mess {mess_id} missing"));
    }
}
