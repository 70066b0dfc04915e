use std::cell::RefCell;
use std::rc::Rc;

use trackball_controls::{
    CommandKind, InteractionState, PointerButton, ProvenanceGraph, ViewAdapter,
};

fn setup() -> (ViewAdapter, Rc<RefCell<ProvenanceGraph>>) {
    let graph = Rc::new(RefCell::new(ProvenanceGraph::new()));
    let mut view = ViewAdapter::new(graph.clone());
    view.set_bounds(0.0, 0.0, 200.0, 200.0);
    (view, graph)
}

#[cfg(test)]
mod gesture_recording_tests {
    use super::*;

    #[test]
    fn rotate_gesture_records_one_orientation_command() {
        let (mut view, graph) = setup();
        let controller = view.controller();
        let initial = controller.borrow().pose();

        controller
            .borrow_mut()
            .pointer_down(PointerButton::Left, 100.0, 100.0);
        controller.borrow_mut().pointer_move(150.0, 100.0);
        view.update(16.0);
        controller.borrow_mut().pointer_up();

        let graph = graph.borrow();
        assert_eq!(graph.len(), 1);

        let command = &graph.commands()[0];
        assert_eq!(command.kind, CommandKind::SetControlOrientation);
        assert_eq!(command.target, view.target_ref());
        assert_eq!(command.old, initial);
        assert_ne!(command.new, initial);
        assert_eq!(command.new, controller.borrow().pose());
    }

    #[test]
    fn move_without_down_records_nothing() {
        let (mut view, graph) = setup();
        let controller = view.controller();

        controller.borrow_mut().pointer_move(150.0, 100.0);
        view.update(16.0);
        controller.borrow_mut().pointer_up();

        assert!(graph.borrow().is_empty());
    }

    #[test]
    fn non_interactive_view_records_nothing() {
        let (mut view, graph) = setup();
        view.set_interactive(false);

        let controller = view.controller();
        controller
            .borrow_mut()
            .pointer_down(PointerButton::Left, 100.0, 100.0);
        controller.borrow_mut().pointer_move(150.0, 100.0);
        view.update(16.0);
        controller.borrow_mut().pointer_up();

        assert!(graph.borrow().is_empty());
    }
}

#[cfg(test)]
mod wheel_coalescing_tests {
    use super::*;

    #[test]
    fn rapid_wheel_ticks_coalesce_into_one_command() {
        let (mut view, graph) = setup();
        let controller = view.controller();
        let initial = controller.borrow().pose();

        controller.borrow_mut().wheel(1.0);
        view.update(100.0); // inside the 500ms quiet window
        controller.borrow_mut().wheel(1.0);
        view.update(600.0); // quiet window passes

        let graph = graph.borrow();
        assert_eq!(graph.len(), 1, "two wheel ticks must coalesce");

        let command = &graph.commands()[0];
        assert_eq!(command.kind, CommandKind::SetControlZoom);
        assert_eq!(command.old, initial);
        assert_ne!(command.new, initial, "zoom must have moved the camera");
    }

    #[test]
    fn separated_wheel_ticks_record_separate_commands() {
        let (mut view, graph) = setup();
        let controller = view.controller();

        controller.borrow_mut().wheel(1.0);
        view.update(600.0);
        controller.borrow_mut().wheel(1.0);
        view.update(600.0);

        assert_eq!(graph.borrow().len(), 2);
    }

    #[test]
    fn zoom_command_old_pose_is_from_the_first_tick() {
        let (mut view, graph) = setup();
        let controller = view.controller();
        let initial = controller.borrow().pose();

        controller.borrow_mut().wheel(1.0);
        view.update(100.0);
        let mid = controller.borrow().pose();
        assert_ne!(mid, initial);

        controller.borrow_mut().wheel(1.0);
        view.update(600.0);

        let graph = graph.borrow();
        assert_eq!(graph.commands()[0].old, initial, "first tick wins as old");
    }
}

#[cfg(test)]
mod replay_tests {
    use super::*;

    /// Run enough updates to complete the default 1000ms replay transition.
    fn settle(view: &mut ViewAdapter) {
        view.update(1030.0);
    }

    #[test]
    fn undo_restores_the_old_pose_without_recording() {
        let (mut view, graph) = setup();
        let controller = view.controller();
        let initial = controller.borrow().pose();

        controller
            .borrow_mut()
            .pointer_down(PointerButton::Left, 100.0, 100.0);
        controller.borrow_mut().pointer_move(150.0, 100.0);
        view.update(16.0);
        controller.borrow_mut().pointer_up();
        let after_gesture = controller.borrow().pose();

        assert!(view.undo());
        assert!(controller.borrow().in_transition(), "replay is animated");
        settle(&mut view);

        assert_eq!(controller.borrow().pose(), initial);
        assert_eq!(graph.borrow().len(), 1, "undo must not grow the history");
        assert_eq!(graph.borrow().applied(), 0);

        assert!(view.redo());
        settle(&mut view);
        assert_eq!(controller.borrow().pose(), after_gesture);
        assert_eq!(graph.borrow().len(), 1);
    }

    #[test]
    fn undo_on_empty_history_reports_false() {
        let (mut view, _graph) = setup();
        assert!(!view.undo());
        assert!(!view.redo());
    }

    #[test]
    fn forced_state_restricts_gesture_kind() {
        let (mut view, graph) = setup();
        let controller = view.controller();

        controller.borrow_mut().set_state(InteractionState::Pan);
        controller
            .borrow_mut()
            .pointer_down(PointerButton::Left, 100.0, 100.0);
        assert_eq!(controller.borrow().state(), InteractionState::Pan);
        controller.borrow_mut().pointer_move(120.0, 100.0);
        view.update(16.0);
        controller.borrow_mut().pointer_up();

        // still one orientation command; panning moved the target
        let graph = graph.borrow();
        assert_eq!(graph.len(), 1);
        assert_ne!(
            graph.commands()[0].new.target,
            graph.commands()[0].old.target
        );
    }

    #[test]
    fn micro_gestures_compress_into_one_entry() {
        let (mut view, graph) = setup();
        let controller = view.controller();
        let initial = controller.borrow().pose();

        for step in 0..3 {
            let x = 100.0 + step as f32 * 10.0;
            controller
                .borrow_mut()
                .pointer_down(PointerButton::Left, x, 100.0);
            controller.borrow_mut().pointer_move(x + 10.0, 100.0);
            view.update(16.0);
            controller.borrow_mut().pointer_up();
        }
        let last = controller.borrow().pose();

        let mut graph = graph.borrow_mut();
        assert_eq!(graph.len(), 3);

        graph.compress();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.commands()[0].old, initial);
        assert_eq!(graph.commands()[0].new, last);
    }
}
