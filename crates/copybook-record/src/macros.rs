//! The `record!` declaration macro.
//!
//! One invocation declares the plain struct, its `Default`
//! construction, the [`Record`](crate::Record) impl, and the static
//! descriptor table in a single definition list, so a property exists
//! in exactly one place.
//!
//! # Example
//!
//! ```
//! use copybook_record::record;
//!
//! record! {
//!     /// One claim service line.
//!     pub struct ClaimLine("ClaimLine") {
//!         "LineNumber" => line_number: Option<i64>,
//!         "ProcedureCode" => procedure_code: Option<String>,
//!     }
//! }
//!
//! record! {
//!     /// A claim header with its service lines.
//!     pub struct Claim("Claim") {
//!         "ClaimNumber" => claim_number: Option<String>,
//!         "LineCount" => line_count: Option<i64>,
//!         @collections {
//!             "Lines" => lines: Vec<ClaimLine> => "ClaimLine",
//!         }
//!     }
//! }
//! ```

/// Declare a destination record type and its descriptor.
///
/// Scalar properties map a layout-facing name to a struct field whose
/// type implements [`FromValue`](crate::FromValue) and
/// [`ToValue`](crate::ToValue). An optional `@nested` block declares
/// record-typed properties reachable as non-terminal path segments, and
/// an optional `@collections` block declares child collections together
/// with the registry name of their element entity.
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident ($ename:literal) {
            $( $(#[$fmeta:meta])* $pname:literal => $field:ident : $fty:ty , )*
            $( @nested {
                $( $(#[$nmeta:meta])* $nname:literal => $nfield:ident : $nty:ty , )*
            } )?
            $( @collections {
                $( $(#[$cmeta:meta])* $cname:literal => $cfield:ident : Vec<$cty:ty> => $centity:literal , )*
            } )?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        $vis struct $name {
            $( $(#[$fmeta])* pub $field: $fty, )*
            $( $( $(#[$nmeta])* pub $nfield: $nty, )* )?
            $( $( $(#[$cmeta])* pub $cfield: Vec<$cty>, )* )?
        }

        impl $crate::Record for $name {
            fn record_descriptor() -> &'static $crate::RecordDescriptor {
                static DESCRIPTOR: ::std::sync::OnceLock<$crate::RecordDescriptor> =
                    ::std::sync::OnceLock::new();
                DESCRIPTOR.get_or_init(|| $crate::RecordDescriptor {
                    name: $ename,
                    properties: vec![
                        $(
                            $crate::PropertyDef {
                                name: $pname,
                                set: |any, value| {
                                    let rec = any
                                        .downcast_mut::<$name>()
                                        .ok_or($crate::BindError::InstanceMismatch {
                                            entity: $ename,
                                        })?;
                                    rec.$field = $crate::FromValue::from_value(value)?;
                                    Ok(())
                                },
                                get: |any| {
                                    any.downcast_ref::<$name>()
                                        .map(|rec| $crate::ToValue::to_value(&rec.$field))
                                        .unwrap_or($crate::Value::Null)
                                },
                                nested: None,
                            },
                        )*
                        $( $(
                            $crate::PropertyDef {
                                name: $nname,
                                set: |_any, _value| {
                                    Err($crate::BindError::RecordProperty {
                                        entity: $ename,
                                        property: $nname,
                                    })
                                },
                                get: |_any| $crate::Value::Null,
                                nested: Some($crate::NestedDef {
                                    descriptor: <$nty as $crate::Record>::record_descriptor,
                                    borrow: |any| {
                                        any.downcast_ref::<$name>()
                                            .map(|rec| &rec.$nfield as &dyn ::std::any::Any)
                                            .ok_or($crate::BindError::InstanceMismatch {
                                                entity: $ename,
                                            })
                                    },
                                    borrow_mut: |any| {
                                        any.downcast_mut::<$name>()
                                            .map(|rec| {
                                                &mut rec.$nfield as &mut dyn ::std::any::Any
                                            })
                                            .ok_or($crate::BindError::InstanceMismatch {
                                                entity: $ename,
                                            })
                                    },
                                }),
                            },
                        )* )?
                    ],
                    collections: vec![
                        $( $(
                            $crate::CollectionDef {
                                name: $cname,
                                child: $centity,
                                push: |any, child| {
                                    let parent = any
                                        .downcast_mut::<$name>()
                                        .ok_or($crate::BindError::InstanceMismatch {
                                            entity: $ename,
                                        })?;
                                    let got =
                                        $crate::Record::descriptor(child.as_ref()).name.to_string();
                                    let child = $crate::Record::into_any(child)
                                        .downcast::<$cty>()
                                        .map_err(|_| $crate::BindError::ChildMismatch {
                                            collection: $cname,
                                            expected: $centity,
                                            got,
                                        })?;
                                    parent.$cfield.push(*child);
                                    Ok(())
                                },
                            },
                        )* )?
                    ],
                })
            }

            fn descriptor(&self) -> &'static $crate::RecordDescriptor {
                <Self as $crate::Record>::record_descriptor()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn ::std::any::Any> {
                self
            }

            fn to_json(&self) -> $crate::serde_json::Value {
                let mut map = $crate::serde_json::Map::new();
                $(
                    map.insert(
                        $pname.to_string(),
                        $crate::ToValue::to_value(&self.$field).to_json(),
                    );
                )*
                $( $(
                    map.insert($nname.to_string(), $crate::Record::to_json(&self.$nfield));
                )* )?
                $( $(
                    map.insert(
                        $cname.to_string(),
                        $crate::serde_json::Value::Array(
                            self.$cfield.iter().map($crate::Record::to_json).collect(),
                        ),
                    );
                )* )?
                $crate::serde_json::Value::Object(map)
            }
        }
    };
}
