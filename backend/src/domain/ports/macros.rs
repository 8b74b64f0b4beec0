//! `define_port_error!`: error enums for driven ports.
//!
//! Each variant declares its fields and a `thiserror` display string. The
//! macro derives the usual traits and adds one snake-case constructor per
//! variant whose parameters accept anything convertible into the field type,
//! so adapters can write `PluginWorkspaceError::io(err.to_string())` or
//! `SnippetRepositoryError::query("timeout")`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:literal
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

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = "Build a [`" $name "::" $variant "`]."]
                    pub fn [<$variant:snake>]($( $($field: impl Into<$ty>),* )?) -> Self {
                        Self::$variant $( { $($field: $field.into()),* } )?
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum UploadError {
            Rejected { status: u16, message: String } => "upload rejected ({status}): {message}",
            Missing { path: String } => "nothing at {path}",
            Cancelled => "upload cancelled",
        }
    }

    #[rstest]
    #[case(UploadError::rejected(413_u16, "too large"), "upload rejected (413): too large")]
    #[case(UploadError::missing("plugins/demo.php"), "nothing at plugins/demo.php")]
    #[case(UploadError::cancelled(), "upload cancelled")]
    fn constructors_render_their_messages(#[case] error: UploadError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn constructors_convert_owned_and_borrowed_text() {
        assert_eq!(
            UploadError::missing(String::from("a.php")),
            UploadError::Missing {
                path: "a.php".to_owned()
            }
        );
    }
}
