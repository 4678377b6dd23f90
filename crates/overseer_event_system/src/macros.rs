//! Declarative helpers for defining payloads and handler groups.

/// Implements [`Event`](crate::Event) for a payload type.
///
/// ```rust
/// use overseer_event_system::impl_event;
///
/// #[derive(Debug)]
/// struct RoundStarted;
///
/// impl_event!(RoundStarted => "server:round_started");
/// ```
#[macro_export]
macro_rules! impl_event {
    ($($event:ty => $name:literal),* $(,)?) => {
        $(
            impl $crate::Event for $event {
                fn event_type() -> &'static str {
                    $name
                }
            }
        )*
    };
}

/// Implements [`Deniable`](crate::Deniable) for payloads with an
/// `is_allowed: bool` field.
#[macro_export]
macro_rules! impl_deniable {
    ($($event:ty),* $(,)?) => {
        $(
            impl $crate::Deniable for $event {
                fn is_allowed(&self) -> bool {
                    self.is_allowed
                }

                fn set_allowed(&mut self, allowed: bool) {
                    self.is_allowed = allowed;
                }
            }
        )*
    };
}

/// Declares a named set of event buses sharing the same settings.
///
/// Generates the struct with one public [`EventBus`](crate::EventBus) field
/// per event kind, plus `new`, `clear`, `handler_count` and `report`.
#[macro_export]
macro_rules! handler_group {
    (
        $(#[$meta:meta])*
        $group:ident {
            $( $(#[$field_meta:meta])* $field:ident : $event:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        pub struct $group {
            $( $(#[$field_meta])* pub $field: $crate::EventBus<$event>, )*
        }

        impl $group {
            pub fn new(settings: &$crate::EventSettings) -> Self {
                Self {
                    $( $field: $crate::EventBus::with_settings(settings), )*
                }
            }

            /// Drops every subscription in the group.
            pub fn clear(&self) {
                $( self.$field.clear(); )*
            }

            pub fn handler_count(&self) -> usize {
                0 $( + self.$field.handler_count() )*
            }

            pub fn report(&self) -> Vec<$crate::BusReport> {
                vec![ $( self.$field.report(), )* ]
            }
        }

        impl ::std::fmt::Debug for $group {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($group))
                    $( .field(stringify!($field), &self.$field.handler_count()) )*
                    .finish()
            }
        }
    };
}
