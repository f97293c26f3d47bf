use crate::dom;
use js_sys::Array;
use sitekit_core::{REVEAL_CLASS, RevealRule, RevealTracker, VISIBLE_CLASS};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Adds `visible` to each `.reveal` element the first time enough of it
/// scrolls into view.
pub struct RevealObserver {
    tracker: Rc<RefCell<RevealTracker<usize>>>,
    observer: Option<(IntersectionObserver, ObserverCallback)>,
}

impl RevealObserver {
    #[must_use]
    pub fn attach(doc: &Document, rule: RevealRule) -> Self {
        let targets = doc
            .query_selector_all(&format!(".{REVEAL_CLASS}"))
            .map(|list| dom::elements(&list))
            .unwrap_or_default();
        let tracker = Rc::new(RefCell::new(RevealTracker::new(rule)));

        if targets.is_empty() {
            return Self {
                tracker,
                observer: None,
            };
        }

        let callback = observer_callback(targets.clone(), Rc::clone(&tracker));
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(rule.threshold()));
        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => {
                for target in &targets {
                    observer.observe(target);
                }
                log::debug!("observing {} reveal targets", targets.len());
                Self {
                    tracker,
                    observer: Some((observer, callback)),
                }
            }
            Err(err) => {
                log::warn!(
                    "IntersectionObserver unavailable, revealing everything: {}",
                    dom::js_error_message(&err)
                );
                for (idx, target) in targets.iter().enumerate() {
                    tracker.borrow_mut().record(idx, true, 1.0);
                    let _ = target.class_list().add_1(VISIBLE_CLASS);
                }
                Self {
                    tracker,
                    observer: None,
                }
            }
        }
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.tracker.borrow().revealed_count()
    }
}

impl Drop for RevealObserver {
    fn drop(&mut self) {
        if let Some((observer, _)) = &self.observer {
            observer.disconnect();
        }
    }
}

fn observer_callback(
    targets: Vec<Element>,
    tracker: Rc<RefCell<RevealTracker<usize>>>,
) -> ObserverCallback {
    Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let target = entry.target();
            let Some(idx) = targets.iter().position(|el| *el == target) else {
                continue;
            };
            let newly = tracker.borrow_mut().record(
                idx,
                entry.is_intersecting(),
                entry.intersection_ratio(),
            );
            if newly {
                let _ = target.class_list().add_1(VISIBLE_CLASS);
                observer.unobserve(&target);
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>)
}
