//! Order form fields and their validation.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// Message for a blank (or whitespace-only) name.
pub const NAME_REQUIRED: &str = "Please enter your name";
/// Message for a missing restaurant.
pub const RESTAURANT_REQUIRED: &str = "Please select a restaurant";
/// Message for a missing dish.
pub const DISH_REQUIRED: &str = "Please select a dish";

/// The fields of the order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    Name,
    Restaurant,
    Dish,
}

impl FormField {
    /// The field key as the UI layer knows it.
    pub fn key(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Restaurant => "restaurant",
            FormField::Dish => "dish",
        }
    }
}

impl Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Current values of the order form. Empty strings mean "not selected".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub restaurant: String,
    pub dish: String,
}

impl FormFields {
    pub fn new(
        name: impl Into<String>,
        restaurant: impl Into<String>,
        dish: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            restaurant: restaurant.into(),
            dish: dish.into(),
        }
    }
}

/// Per-field validation messages. A field is present only if it is invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FormField, &'static str>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for `field`, if it is invalid.
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    /// Drops the message for a single field, leaving the others untouched.
    pub fn clear(&mut self, field: FormField) -> bool {
        self.0.remove(&field).is_some()
    }

    /// Invalid fields in form order.
    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn insert(&mut self, field: FormField, message: &'static str) {
        self.0.insert(field, message);
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Checks the form and returns an entry for every invalid field.
///
/// Dish membership in the selected restaurant is not re-checked here; the
/// session's field setters never let a foreign dish into the form.
pub fn validate(fields: &FormFields) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if fields.name.trim().is_empty() {
        errors.insert(FormField::Name, NAME_REQUIRED);
    }
    if fields.restaurant.is_empty() {
        errors.insert(FormField::Restaurant, RESTAURANT_REQUIRED);
    }
    if fields.dish.is_empty() {
        errors.insert(FormField::Dish, DISH_REQUIRED);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_form_is_valid() {
        let fields = FormFields::new("Ana", "Agadir", "Classic Burger");
        assert_eq!(validate(&fields), ValidationErrors::default());
    }

    #[test]
    fn empty_form_reports_every_field() {
        let errors = validate(&FormFields::default());
        let fields: Vec<FormField> = errors.fields().collect();
        assert_eq!(fields, vec![FormField::Name, FormField::Restaurant, FormField::Dish]);
        assert_eq!(errors.get(FormField::Name), Some(NAME_REQUIRED));
        assert_eq!(errors.get(FormField::Restaurant), Some(RESTAURANT_REQUIRED));
        assert_eq!(errors.get(FormField::Dish), Some(DISH_REQUIRED));
    }

    #[test]
    fn whitespace_name_is_blank() {
        for name in ["", " ", "\t  \n"] {
            let errors = validate(&FormFields::new(name, "Agadir", "Classic Burger"));
            assert_eq!(errors.len(), 1, "name {:?}", name);
            assert_eq!(errors.get(FormField::Name), Some(NAME_REQUIRED));
        }
    }

    #[test]
    fn name_error_is_independent_of_other_fields() {
        let errors = validate(&FormFields::new("", "Giraffe", ""));
        assert!(errors.contains(FormField::Name));
        assert!(!errors.contains(FormField::Restaurant));
        assert!(errors.contains(FormField::Dish));
    }

    #[test]
    fn validation_is_deterministic() {
        let fields = FormFields::new(" ", "", "Falafel");
        assert_eq!(validate(&fields), validate(&fields));
    }

    #[test]
    fn clear_removes_a_single_entry() {
        let mut errors = validate(&FormFields::default());
        assert!(errors.clear(FormField::Restaurant));
        assert!(!errors.clear(FormField::Restaurant));
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(FormField::Name));
        assert!(errors.contains(FormField::Dish));
    }

    #[test]
    fn display_lists_fields_in_form_order() {
        let errors = validate(&FormFields::new("", "", "x"));
        assert_eq!(
            errors.to_string(),
            "name: Please enter your name; restaurant: Please select a restaurant"
        );
    }
}
