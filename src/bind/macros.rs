/// Declares a struct together with its [`Bindable`](crate::bind::Bindable) implementation.
///
/// Value fields must implement [`FromDecoded`](crate::decode::FromDecoded) and
/// `Default`. Fields listed in the optional `groups` section are lists of nested
/// bindable records, filled from dotted column labels such as `items.name`.
///
/// ```
/// use rusty_records::{bindable, bindable_enum};
///
/// bindable_enum! {
///     #[derive(Debug, Default, PartialEq)]
///     pub enum Status {
///         #[default]
///         Open,
///         Closed,
///     }
/// }
///
/// bindable! {
///     #[derive(Debug, Default)]
///     pub struct Line {
///         pub name: String,
///         pub qty: i32,
///     }
/// }
///
/// bindable! {
///     #[derive(Debug, Default)]
///     pub struct Order {
///         pub id: i64,
///         pub status: Status,
///     }
///     groups {
///         pub items: Vec<Line>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! bindable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($(#[$field_meta:meta])* $field_vis:vis $field:ident : $ty:ty),* $(,)?
        }
        $(groups {
            $($(#[$group_meta:meta])* $group_vis:vis $group:ident : Vec<$element:ty>),* $(,)?
        })?
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($(#[$field_meta])* $field_vis $field: $ty,)*
            $($($(#[$group_meta])* $group_vis $group: Vec<$element>,)*)?
        }

        impl $crate::bind::Bindable for $name {
            fn descriptor() -> $crate::bind::TypeDescriptor {
                $crate::bind::TypeDescriptor::new(
                    stringify!($name),
                    vec![
                        $($crate::bind::FieldDescriptor::value(
                            stringify!($field),
                            <$ty as $crate::decode::FromDecoded>::target(),
                        ),)*
                        $($($crate::bind::FieldDescriptor::group(stringify!($group), stringify!($element)),)*)?
                    ],
                )
            }

            #[allow(unused_variables)]
            fn assign(
                &mut self,
                field: &str,
                value: $crate::decode::Decoded,
            ) -> ::std::result::Result<(), $crate::bind::AssignError> {
                $(if field == stringify!($field) {
                    self.$field = <$ty as $crate::decode::FromDecoded>::from_decoded(value)
                        .ok_or($crate::bind::AssignError::Mismatch)?;
                    return Ok(());
                })*
                Err($crate::bind::AssignError::UnknownField)
            }

            #[allow(unused_variables)]
            fn group_mut(&mut self, field: &str) -> ::std::option::Option<&mut dyn $crate::bind::Group> {
                $($(if field == stringify!($group) {
                    return Some(&mut self.$group as &mut dyn $crate::bind::Group);
                })*)?
                None
            }
        }
    };
}

/// Declares a unit enum whose members decode from their exact, case-sensitive names.
#[macro_export]
macro_rules! bindable_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$member_meta:meta])* $member:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $($(#[$member_meta])* $member,)*
        }

        impl $name {
            /// Member names in declaration order.
            pub const MEMBERS: &'static [&'static str] = &[$(stringify!($member)),*];
        }

        impl $crate::decode::FromDecoded for $name {
            fn target() -> $crate::decode::TargetType {
                $crate::decode::TargetType::Enum($crate::decode::EnumType {
                    id: ::std::any::TypeId::of::<$name>(),
                    name: stringify!($name),
                    members: $name::MEMBERS,
                })
            }

            fn from_decoded(value: $crate::decode::Decoded) -> ::std::option::Option<Self> {
                match value {
                    $crate::decode::Decoded::Enum(index) => [$($name::$member),*].into_iter().nth(index),
                    _ => None,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::bind::binder::Binder;
    use crate::bind::BindError;
    use crate::bind::Bindable;
    use crate::bind::FieldDescriptor;
    use crate::decode::Decoded;
    use crate::decode::FromDecoded;
    use crate::decode::TargetType;
    use crate::table::Record;
    use crate::table::Value;
    use pretty_assertions::assert_eq;

    bindable_enum! {
        #[derive(Debug, Default, PartialEq)]
        enum Priority {
            #[default]
            Low,
            High,
        }
    }

    bindable! {
        #[derive(Debug, Default, PartialEq)]
        struct Task {
            /// Free text
            title: String,
            priority: Priority,
            due: Option<chrono::NaiveDate>,
            tags: Vec<String>,
        }
        groups {
            subtasks: Vec<Task>,
        }
    }

    bindable! {
        #[derive(Debug, Default)]
        struct Empty {}
    }

    #[test]
    fn struct_descriptor_lists_fields_in_order() {
        let descriptor = Task::descriptor();
        assert_eq!(descriptor.name, "Task");
        let names: Vec<&str> = descriptor.fields.iter().map(|field| field.name).collect();
        assert_eq!(names, vec!["title", "priority", "due", "tags", "subtasks"]);
        assert_eq!(descriptor.fields[2], FieldDescriptor::value("due", TargetType::Date));
        assert!(descriptor.fields[4].is_group());
        assert!(Empty::descriptor().fields.is_empty());
    }

    #[test]
    fn enum_members_follow_declaration_order() {
        assert_eq!(Priority::MEMBERS, &["Low", "High"]);
        assert_eq!(Priority::from_decoded(Decoded::Enum(1)), Some(Priority::High));
        assert_eq!(Priority::from_decoded(Decoded::Enum(2)), None);
        assert!(matches!(Priority::target(), TargetType::Enum(ref enum_type) if enum_type.name == "Priority"));
    }

    #[test]
    fn assign_checks_field_and_shape() {
        let mut task = Task::default();
        assert!(task.assign("title", Decoded::Text(Some("Write".to_owned()))).is_ok());
        assert!(task.assign("title", Decoded::Integer(1)).is_err());
        assert!(task.assign("subtasks", Decoded::List(vec![])).is_err());
        assert!(task.group_mut("subtasks").is_some());
        assert!(task.group_mut("title").is_none());
        assert_eq!(task.title, "Write");
    }

    #[test]
    fn recursive_groups_bind_one_level() {
        let record: Record = [
            ("title".to_owned(), Value::scalar("Release")),
            ("priority".to_owned(), Value::scalar("High")),
            ("due".to_owned(), Value::scalar("2024-03-01")),
            ("subtasks.title".to_owned(), Value::list(&["Tag", "Publish"])),
        ]
        .into_iter()
        .collect();

        let task: Task = Binder::new().bind(&record).unwrap();
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due, chrono::NaiveDate::from_ymd_opt(2024, 3, 1));
        let titles: Vec<&str> = task.subtasks.iter().map(|task| task.title.as_str()).collect();
        assert_eq!(titles, vec!["Tag", "Publish"]);

        let record: Record = [("subtasks.subtasks.title".to_owned(), Value::list(&["x"]))].into_iter().collect();
        assert!(matches!(Binder::new().bind::<Task>(&record), Err(BindError::UnsupportedPath { .. })));
    }

    #[test]
    fn list_fields_take_list_values() {
        let record: Record = [("tags.".to_owned(), Value::list(&["a"]))].into_iter().collect();
        assert!(matches!(Binder::new().bind::<Task>(&record), Err(BindError::NotAGroup { .. })));

        // a plain list field is only reachable through a list value under its own key
        let mut task = Task::default();
        let decoded = Decoded::List(vec![Decoded::Text(Some("a".to_owned())), Decoded::Text(None)]);
        task.assign("tags", decoded).unwrap();
        assert_eq!(task.tags, vec!["a".to_owned(), String::new()]);
    }
}
