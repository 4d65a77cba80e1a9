//! WASM bridge for SiteKit — exposes the editing session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web` and loaded by the browser
//! editor. Structured data crosses the boundary as JSON strings.

use sk_codegen::{ExportOptions, generate_component, generate_html};
use sk_core::{CanvasPatch, ElementKind, ElementPatch, NodeId, Project, lint_document};
use sk_editor::tools::drop_new_element;
use sk_editor::{
    EditorSession, GestureController, GestureOutcome, InputEvent, Modifiers, PointerCapture,
    SessionConfig,
};
use wasm_bindgen::prelude::*;

/// Pointer capture on the canvas element, so drags keep receiving moves
/// and the release even outside its bounds.
#[derive(Default)]
struct ElementCapture {
    element: Option<web_sys::Element>,
    pointer_id: i32,
}

impl PointerCapture for ElementCapture {
    fn acquire(&mut self) {
        if let Some(el) = &self.element
            && let Err(e) = el.set_pointer_capture(self.pointer_id)
        {
            log::warn!("setPointerCapture failed: {e:?}");
        }
    }

    fn release(&mut self) {
        if let Some(el) = &self.element
            && let Err(e) = el.release_pointer_capture(self.pointer_id)
        {
            log::debug!("releasePointerCapture failed: {e:?}");
        }
    }
}

/// The main WASM-facing editor controller.
///
/// Holds the session and the gesture controller. All interaction from
/// the page goes through this struct. Mutation methods do not commit;
/// call `commit(label)` to close a history step.
#[wasm_bindgen]
pub struct SiteCanvas {
    session: EditorSession,
    gestures: GestureController<ElementCapture>,
    export_options: ExportOptions,
}

impl Default for SiteCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SiteCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        console_logger_setup();

        Self {
            session: EditorSession::new(SessionConfig::default()),
            gestures: GestureController::new(ElementCapture::default()),
            export_options: ExportOptions::default(),
        }
    }

    /// Element that receives pointer capture during gestures.
    pub fn set_capture_element(&mut self, element: Option<web_sys::Element>) {
        self.gestures.capture_mut().element = element;
    }

    // ─── Project I/O ─────────────────────────────────────────────────────

    /// Replace the project. Returns `false` if the JSON does not decode;
    /// the current project is kept in that case.
    pub fn load_project(&mut self, json: &str) -> bool {
        match Project::from_json(json) {
            Ok(project) => {
                self.gestures.cancel();
                self.session.load(project);
                true
            }
            Err(e) => {
                log::warn!("load_project: {e}");
                false
            }
        }
    }

    pub fn project_json(&self) -> String {
        self.session.to_project().to_json().unwrap_or_else(|e| {
            log::error!("project_json: {e}");
            String::new()
        })
    }

    /// Bumped on every model change; hosts poll it to drive auto-save.
    pub fn revision(&self) -> f64 {
        self.session.revision() as f64
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Create a default element centered on a viewport drop point and
    /// commit it. Returns the new id, or `""` for an unknown type.
    pub fn drop_element(
        &mut self,
        kind: &str,
        client_x: f32,
        client_y: f32,
        canvas_left: f32,
        canvas_top: f32,
    ) -> String {
        let kind: ElementKind = match kind.parse() {
            Ok(k) => k,
            Err(e) => {
                log::warn!("drop_element: {e}");
                return String::new();
            }
        };
        drop_new_element(
            &mut self.session,
            kind,
            (client_x, client_y),
            (canvas_left, canvas_top),
        )
        .to_string()
    }

    /// Merge a JSON patch (`{"styles": {...}, "position": {...}}`) into
    /// the element. Returns whether it changed.
    pub fn update_element(&mut self, id: &str, patch_json: &str) -> bool {
        match serde_json::from_str::<ElementPatch>(patch_json) {
            Ok(patch) => self.session.update(NodeId::intern(id), &patch),
            Err(e) => {
                log::warn!("update_element: {e}");
                false
            }
        }
    }

    pub fn update_canvas(&mut self, patch_json: &str) -> bool {
        match serde_json::from_str::<CanvasPatch>(patch_json) {
            Ok(patch) => {
                self.session.update_canvas(&patch);
                true
            }
            Err(e) => {
                log::warn!("update_canvas: {e}");
                false
            }
        }
    }

    pub fn delete_element(&mut self, id: &str) -> bool {
        self.session.delete(NodeId::intern(id))
    }

    /// Delete the element and everything it contains. Returns the number
    /// of elements removed.
    pub fn delete_cascade(&mut self, id: &str) -> u32 {
        self.session.delete_cascade(NodeId::intern(id)).len() as u32
    }

    /// Returns the copy's id, or `""` if `id` is unknown.
    pub fn duplicate_element(&mut self, id: &str) -> String {
        self.session
            .duplicate(NodeId::intern(id))
            .map(|copy| copy.to_string())
            .unwrap_or_default()
    }

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        self.session.bring_to_front(NodeId::intern(id))
    }

    pub fn send_to_back(&mut self, id: &str) -> bool {
        self.session.send_to_back(NodeId::intern(id))
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn commit(&mut self, action: &str) {
        self.session.commit(action);
    }

    pub fn undo(&mut self) -> bool {
        self.gestures.cancel();
        self.session.undo().is_some()
    }

    pub fn redo(&mut self) -> bool {
        self.gestures.cancel();
        self.session.redo().is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select(&mut self, id: &str) -> bool {
        self.session.select(NodeId::intern(id))
    }

    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    /// The selected element as JSON, or `"null"`.
    pub fn selected_json(&self) -> String {
        serde_json::to_string(&self.session.selected()).unwrap_or_else(|_| "null".to_string())
    }

    /// Ids of elements overlapping the rectangle (marquee selection).
    pub fn nodes_in_rect(&self, x: f32, y: f32, w: f32, h: f32) -> js_sys::Array {
        self.session
            .document()
            .get_nodes_in_rect(x, y, w, h)
            .into_iter()
            .map(|id| JsValue::from_str(id.as_str()))
            .collect()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Returns the outcome as JSON (see `outcome_json`).
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        pointer_id: i32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        self.gestures.capture_mut().pointer_id = pointer_id;
        let modifiers = Modifiers {
            ctrl,
            shift,
            alt,
            meta,
        };
        self.dispatch(InputEvent::PointerDown { x, y, modifiers })
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32, shift: bool) -> String {
        let modifiers = Modifiers {
            shift,
            ..Modifiers::NONE
        };
        self.dispatch(InputEvent::PointerMove { x, y, modifiers })
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32, shift: bool) -> String {
        let modifiers = Modifiers {
            shift,
            ..Modifiers::NONE
        };
        self.dispatch(InputEvent::PointerUp { x, y, modifiers })
    }

    /// `pointercancel` or focus loss.
    pub fn cancel_gesture(&mut self) -> String {
        self.dispatch(InputEvent::Cancel)
    }

    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let modifiers = Modifiers {
            ctrl,
            shift,
            alt,
            meta,
        };
        self.dispatch(InputEvent::key(key, modifiers))
    }

    // ─── Lint / export ───────────────────────────────────────────────────

    /// Lint diagnostics as a JSON array.
    pub fn lint(&self) -> String {
        let diags = lint_document(self.session.document());
        serde_json::to_string(&diags).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn export_html(&self) -> String {
        generate_html(&self.session.to_project(), &self.export_options)
    }

    /// `{"name", "component", "stylesheet"}` as JSON.
    pub fn export_component(&self, name: Option<String>) -> String {
        let export = generate_component(
            &self.session.to_project(),
            name.as_deref(),
            &self.export_options,
        );
        serde_json::to_string(&export).unwrap_or_default()
    }
}

impl SiteCanvas {
    fn dispatch(&mut self, event: InputEvent) -> String {
        let outcome = self.gestures.handle(&event, &mut self.session);
        outcome_json(&outcome).to_string()
    }
}

/// `{"kind": ..., ...}` for the page's event handlers.
fn outcome_json(outcome: &GestureOutcome) -> serde_json::Value {
    use serde_json::json;
    match outcome {
        GestureOutcome::None => json!({ "kind": "none" }),
        GestureOutcome::Selected(id) => json!({
            "kind": "selected",
            "id": id.map(|id| id.to_string()),
        }),
        GestureOutcome::Started { id, resizing } => json!({
            "kind": "started",
            "id": id.as_str(),
            "resizing": resizing,
        }),
        GestureOutcome::Preview(p) => json!({
            "kind": "preview",
            "id": p.id.as_str(),
            "position": p.position,
            "dimensions": p.dimensions,
        }),
        GestureOutcome::Committed { id, action } => json!({
            "kind": "committed",
            "id": id.as_str(),
            "action": action,
        }),
        GestureOutcome::Cancelled => json!({ "kind": "cancelled" }),
        GestureOutcome::Shortcut { action, changed } => json!({
            "kind": "shortcut",
            "action": format!("{action:?}"),
            "changed": changed,
        }),
    }
}

// ─── Panic hook and logging for WASM debugging ───────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("SiteKit WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            _ => web_sys::console::log_1(&msg),
        }
    }

    fn flush(&self) {}
}

fn console_logger_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        static LOGGER: ConsoleLogger = ConsoleLogger;
        // Already installed on a second canvas; that's fine.
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Info);
        }
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Validate project JSON. Returns `{"ok":true}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate(json: &str) -> String {
    match Project::from_json(json) {
        Ok(_) => r#"{"ok":true}"#.to_string(),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    const PROJECT: &str = r###"{
        "name": "Bridge",
        "elements": [
            { "id": "a", "type": "text", "position": { "x": 0, "y": 0, "z": 0 },
              "dimensions": { "width": 100, "height": 40 }, "content": { "text": "## Hi" } }
        ]
    }"###;

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn load_and_roundtrip() {
        let mut canvas = SiteCanvas::new();
        assert!(canvas.load_project(PROJECT));
        assert!(!canvas.load_project("{ nope"));
        let back = parse(&canvas.project_json());
        assert_eq!(back["name"], "Bridge");
        assert_eq!(back["elements"][0]["id"], "a");
    }

    #[test]
    fn drop_update_commit_undo() {
        let mut canvas = SiteCanvas::new();
        canvas.load_project(PROJECT);
        let id = canvas.drop_element("button", 300.0, 300.0, 0.0, 0.0);
        assert!(!id.is_empty());
        assert_eq!(canvas.drop_element("carousel", 0.0, 0.0, 0.0, 0.0), "");

        assert!(canvas.update_element(&id, r##"{"styles":{"color":"#000"}}"##));
        canvas.commit("update_element");
        assert_eq!(parse(&canvas.selected_json())["styles"]["color"], "#000");

        assert!(canvas.undo());
        assert_eq!(canvas.selected_json(), "null");
        assert!(canvas.undo());
        assert_eq!(canvas.session.document().len(), 1);
        assert!(!canvas.undo());
        assert!(canvas.can_redo());
    }

    #[test]
    fn pointer_drag_over_bridge() {
        let mut canvas = SiteCanvas::new();
        canvas.load_project(PROJECT);
        let down = parse(&canvas.handle_pointer_down(10.0, 10.0, 1, false, false, false, false));
        assert_eq!(down["kind"], "started");
        let moved = parse(&canvas.handle_pointer_move(30.0, 15.0, false));
        assert_eq!(moved["position"]["x"], 20.0);
        let up = parse(&canvas.handle_pointer_up(30.0, 15.0, false));
        assert_eq!(up["action"], "move_element");
        assert!(canvas.can_undo());
    }

    #[test]
    fn keys_and_lint_and_export() {
        let mut canvas = SiteCanvas::new();
        canvas.load_project(PROJECT);
        canvas.select("a");
        let out = parse(&canvas.handle_key("d", true, false, false, false));
        assert_eq!(out["action"], "Duplicate");
        assert_eq!(out["changed"], true);

        assert_eq!(canvas.lint(), "[]");

        let html = canvas.export_html();
        assert!(html.contains("<h2 class=\"element-a\">## Hi</h2>"));
        let component = parse(&canvas.export_component(None));
        assert_eq!(component["name"], "Bridge");
    }

    #[test]
    fn validate_reports_errors() {
        assert_eq!(validate("{}"), r#"{"ok":true}"#);
        assert_eq!(parse(&validate("[")).get("ok"), Some(&Value::Bool(false)));
    }
}
