//! Component trait: the interface every pane implements.
//!
//! Components own their local UI state (selection, filters, pollers) and
//! read store data from `&AppState`. They never touch the stores; they return
//! `Action`s and the App carries them out.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;
use crate::bus::{EventBus, StoreEvent, Subscription};
use crate::store::Dispatcher;

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Only called while this component has focus.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Called once when the component goes on screen: subscribe to the bus,
    /// start pollers.
    fn mount(&mut self, _bus: &EventBus, _dispatcher: &Dispatcher) {}

    /// The component's bus subscription, if it has one.
    fn subscription(&mut self) -> Option<&mut Subscription> {
        None
    }

    /// A store event this component subscribed to.
    fn on_event(&mut self, _event: StoreEvent, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);
}

/// Drain `component`'s subscription and run its handler for each event.
pub fn deliver(component: &mut dyn Component, state: &AppState) -> Vec<Action> {
    let events = match component.subscription() {
        Some(sub) => sub.drain(),
        None => return Vec::new(),
    };
    let mut actions = Vec::new();
    for event in events {
        actions.extend(component.on_event(event, state));
    }
    actions
}
