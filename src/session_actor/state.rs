//! The session's single owned state record and its mutation entry points.
//!
//! Form fields, validation errors, the tracked order and the last operation
//! error all live in [`SessionState`]. Only the session actor holds one
//! mutably; everybody else sees clones through snapshots.

use super::error::SessionError;
use crate::model::{validate, Catalog, FormField, FormFields, Order, OrderId, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub fields: FormFields,
    pub errors: ValidationErrors,
    pub order: Option<Order>,
    pub last_error: Option<String>,
}

/// What observers see after every mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub polling: bool,
    /// A create-order request is in flight.
    pub submitting: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_id(&self) -> Option<&OrderId> {
        self.order.as_ref().map(|order| &order.id)
    }

    pub fn set_name(&mut self, name: String) {
        self.fields.name = name;
        self.errors.clear(FormField::Name);
    }

    /// Selects a restaurant and returns the dishes it offers.
    ///
    /// The dish is cleared on every call, including re-selecting the same
    /// restaurant. An empty name clears the selection.
    pub fn select_restaurant<'c>(
        &mut self,
        catalog: &'c Catalog,
        restaurant: String,
    ) -> Result<&'c [String], SessionError> {
        if !restaurant.is_empty() && !catalog.contains_restaurant(&restaurant) {
            return Err(SessionError::UnknownRestaurant(restaurant));
        }
        let dishes = catalog.lookup(&restaurant);
        self.fields.restaurant = restaurant;
        self.fields.dish.clear();
        self.errors.clear(FormField::Restaurant);
        Ok(dishes)
    }

    /// Selects a dish of the current restaurant. An empty dish clears the selection.
    pub fn select_dish(&mut self, catalog: &Catalog, dish: String) -> Result<(), SessionError> {
        if !dish.is_empty() {
            if self.fields.restaurant.is_empty() {
                return Err(SessionError::NoRestaurantSelected);
            }
            if !catalog.offers(&self.fields.restaurant, &dish) {
                return Err(SessionError::DishNotOffered {
                    restaurant: self.fields.restaurant.clone(),
                    dish,
                });
            }
        }
        self.fields.dish = dish;
        self.errors.clear(FormField::Dish);
        Ok(())
    }

    /// Recomputes the error map wholesale and returns a copy.
    pub fn run_validation(&mut self) -> ValidationErrors {
        self.errors = validate(&self.fields);
        self.errors.clone()
    }

    /// Marks the start of a new operation attempt. Returns whether an error was cleared.
    pub fn begin_attempt(&mut self) -> bool {
        self.last_error.take().is_some()
    }

    pub fn place_order(&mut self, id: OrderId) -> &Order {
        self.order.insert(Order::new(id))
    }

    /// Overwrites the tracked order's status. Returns whether it changed.
    pub fn apply_status(&mut self, status: String) -> bool {
        self.last_error = None;
        match self.order.as_mut() {
            Some(order) if order.status != status => {
                order.status = status;
                true
            }
            _ => false,
        }
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }
}
