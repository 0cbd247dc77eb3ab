//! The `record!` macro: declare a struct once, get its loader layout for free.

/// Declares a struct and implements [`Record`](crate::Record) for it.
///
/// Field order in the declaration is the token order on the line. Every field
/// type must implement [`FieldType`](crate::FieldType).
///
/// ```
/// refdat_loader::record! {
///     #[derive(Debug, Default, Clone, PartialEq)]
///     pub struct Person {
///         pub name: String,
///         pub age: u32,
///     }
/// }
///
/// use refdat_loader::Record;
/// assert_eq!(Person::FIELDS.len(), 2);
/// assert_eq!(Person::FIELDS[1].name, "age");
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            const FIELDS: &'static [$crate::FieldDescriptor] = &[
                $(
                    $crate::FieldDescriptor::new(
                        stringify!($field),
                        <$ty as $crate::FieldType>::KIND,
                    ),
                )*
            ];

            #[allow(unused_assignments, unused_mut, unused_variables)]
            fn set_field(
                &mut self,
                index: usize,
                value: $crate::FieldValue,
            ) -> ::std::result::Result<(), $crate::ConvertError> {
                let mut slot = 0usize;
                $(
                    if index == slot {
                        self.$field = <$ty as $crate::FieldType>::from_value(value)?;
                        return ::std::result::Result::Ok(());
                    }
                    slot += 1;
                )*
                ::std::result::Result::Err($crate::ConvertError::NoSuchField {
                    index,
                    field_count: <Self as $crate::Record>::FIELDS.len(),
                })
            }
        }
    };
}
