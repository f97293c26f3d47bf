use crate::dom;
use sitekit_core::{MENU_OPEN_CLASS, MenuState};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, Event};

pub const TOGGLE_SELECTOR: &str = ".nav-toggle";
pub const MENU_SELECTOR: &str = "#menu";

/// Hamburger button that opens and closes the mobile menu.
pub struct NavToggle {
    toggle: Element,
    menu: Element,
    click: Closure<dyn FnMut(Event)>,
}

impl NavToggle {
    /// Returns `None` when the page lacks the button or the menu.
    #[must_use]
    pub fn attach(doc: &Document) -> Option<Self> {
        let toggle = dom::query(doc, TOGGLE_SELECTOR)?;
        let menu = dom::query(doc, MENU_SELECTOR)?;

        let (btn, panel) = (toggle.clone(), menu.clone());
        let click = Closure::wrap(Box::new(move |_event: Event| {
            flip(&btn, &panel);
        }) as Box<dyn FnMut(Event)>);
        toggle
            .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
            .ok()?;

        Some(Self {
            toggle,
            menu,
            click,
        })
    }

    #[must_use]
    pub fn state(&self) -> MenuState {
        MenuState::from_aria(self.toggle.get_attribute("aria-expanded").as_deref())
    }

    #[must_use]
    pub fn menu_open(&self) -> bool {
        self.menu.class_list().contains(MENU_OPEN_CLASS)
    }
}

impl Drop for NavToggle {
    fn drop(&mut self) {
        let _ = self
            .toggle
            .remove_event_listener_with_callback("click", self.click.as_ref().unchecked_ref());
    }
}

// The attribute and the class flip independently, as the markup may start
// them out of step.
fn flip(toggle: &Element, menu: &Element) {
    let mut state = MenuState::from_aria(toggle.get_attribute("aria-expanded").as_deref());
    let _ = toggle.set_attribute("aria-expanded", state.toggle());
    let _ = menu.class_list().toggle(MENU_OPEN_CLASS);
}
