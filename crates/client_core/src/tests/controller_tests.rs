use super::*;
use crate::{
    loader::RetryPolicy,
    render::RenderTrigger,
    store::{EmployeeStore, LoadState},
    test_support::{
        employee_json, error_body, fields, list_body, Notice, RecordingNotifier,
        RecordingRenderer, ScriptedDialog, ScriptedTransport,
    },
};
use shared::protocol::{Method, Route};

struct Harness {
    transport: Arc<ScriptedTransport>,
    renderer: Arc<RecordingRenderer>,
    notifier: Arc<RecordingNotifier>,
    dialog: Arc<ScriptedDialog>,
    controller: RosterController,
}

fn harness(dialog: Arc<ScriptedDialog>) -> Harness {
    let transport = ScriptedTransport::new();
    let renderer = RecordingRenderer::new();
    let notifier = RecordingNotifier::new();
    let api = RosterApi::new(transport.clone());
    let render: Arc<dyn RenderTrigger> = renderer.clone();
    let loader = Arc::new(
        ListLoader::new(api.clone(), Arc::new(EmployeeStore::new()), render)
            .with_retry_policy(RetryPolicy::immediate(3)),
    );
    let controller = RosterController::new(api, loader, dialog.clone(), notifier.clone());
    Harness {
        transport,
        renderer,
        notifier,
        dialog,
        controller,
    }
}

#[tokio::test]
async fn add_submits_dialog_input_then_refreshes() {
    let h = harness(ScriptedDialog::new(
        true,
        Some(fields(" Ann ", "Lee", "09:00", "17:00")),
    ));
    h.transport.push_body("{}");
    h.transport
        .push_body(list_body(&[employee_json(1, "Ann", "Lee", "09:00", "17:00")]));

    let outcome = h.controller.add_employee().await.expect("add");

    assert_eq!(outcome, ActionOutcome::Completed);
    assert_eq!(
        h.transport.routes(),
        vec![Route::add_employee(), Route::list_employees()]
    );
    assert_eq!(
        h.transport.forms()[0],
        Some(fields("Ann", "Lee", "09:00", "17:00"))
    );
    assert_eq!(
        h.notifier.notices(),
        vec![Notice::Cleared, Notice::Toast(ADDED_MESSAGE.to_string())]
    );
    let prompts = h.dialog.prompts();
    assert_eq!(prompts, vec![(Prompt::add_employee(), None)]);
    assert!(matches!(h.renderer.states().last(), Some(LoadState::Loaded(_))));
}

#[tokio::test]
async fn cancelled_dialogs_send_nothing() {
    let h = harness(ScriptedDialog::new(false, None));

    assert_eq!(
        h.controller.add_employee().await.expect("add"),
        ActionOutcome::Cancelled
    );
    assert_eq!(
        h.controller
            .delete_employee(EmployeeId(3))
            .await
            .expect("delete"),
        ActionOutcome::Cancelled
    );

    assert_eq!(h.transport.call_count(), 0);
    assert!(h.notifier.notices().is_empty());
    assert_eq!(h.dialog.prompts()[1].0, Prompt::confirm_deletion());
}

#[tokio::test]
async fn confirmed_delete_refreshes_without_the_record() {
    let h = harness(ScriptedDialog::new(true, None));
    h.transport.push_body(r#"{"message":"Actions completed successfully."}"#);
    h.transport
        .push_body(list_body(&[employee_json(2, "Bo", "Kim", "12:00", "20:00")]));

    let outcome = h
        .controller
        .delete_employee(EmployeeId(1))
        .await
        .expect("delete");

    assert_eq!(outcome, ActionOutcome::Completed);
    assert_eq!(
        h.transport.routes(),
        vec![Route::delete_employee(EmployeeId(1)), Route::list_employees()]
    );
    let state = h.controller.loader().store().get_state().await;
    assert_eq!(
        state.employees().map(|list| list.ids()),
        Some(vec![EmployeeId(2)])
    );
    assert!(h
        .notifier
        .notices()
        .contains(&Notice::Toast(DELETED_MESSAGE.to_string())));
}

#[tokio::test]
async fn edit_prefills_from_loaded_list() {
    let h = harness(ScriptedDialog::new(
        true,
        Some(fields("Ann", "Lee", "10:00", "18:00")),
    ));
    h.transport
        .push_body(list_body(&[employee_json(5, "Ann", "Lee", "09:00", "17:00")]));
    h.transport.push_body("{}");
    h.transport
        .push_body(list_body(&[employee_json(5, "Ann", "Lee", "10:00", "18:00")]));

    let outcome = h.controller.edit_employee(EmployeeId(5)).await.expect("edit");

    assert_eq!(outcome, ActionOutcome::Completed);
    assert_eq!(
        h.dialog.prompts(),
        vec![(
            Prompt::edit_employee(),
            Some(fields("Ann", "Lee", "09:00", "17:00"))
        )]
    );
    let routes = h.transport.routes();
    assert_eq!(routes.len(), 3);
    assert_eq!(routes[1].method, Method::Post);
    assert_eq!(routes[1].path, "api/employee/5");
    let updated = h
        .controller
        .loader()
        .store()
        .employee(EmployeeId(5))
        .await
        .expect("still listed");
    assert_eq!(updated.shift_label(), "10:00 - 18:00");
}

#[tokio::test]
async fn edit_without_prefill_skips_the_initial_list_fetch() {
    let h = harness(ScriptedDialog::without_prefill(fields(
        "Ann", "Lee", "10:00", "18:00",
    )));
    h.transport.push_body("{}");
    h.transport
        .push_body(list_body(&[employee_json(5, "Ann", "Lee", "10:00", "18:00")]));

    let outcome = h.controller.edit_employee(EmployeeId(5)).await.expect("edit");

    assert_eq!(outcome, ActionOutcome::Completed);
    assert_eq!(
        h.transport.routes(),
        vec![Route::edit_employee(EmployeeId(5)), Route::list_employees()]
    );
    assert_eq!(h.dialog.prompts(), vec![(Prompt::edit_employee(), None)]);
}

#[tokio::test]
async fn backend_rejection_is_shown_and_not_retried() {
    let h = harness(ScriptedDialog::new(true, None));
    h.transport.push_body(error_body("No employee id [9] found."));

    let err = h
        .controller
        .delete_confirmed(EmployeeId(9))
        .await
        .expect_err("rejected");

    assert_eq!(err.backend_message(), Some("No employee id [9] found."));
    assert_eq!(h.transport.call_count(), 1);
    assert_eq!(
        h.notifier.notices(),
        vec![Notice::Error {
            title: "Error".to_string(),
            message: "No employee id [9] found.".to_string(),
        }]
    );
    assert!(h.renderer.states().is_empty());
}

#[tokio::test]
async fn invalid_input_never_reaches_the_backend() {
    let h = harness(ScriptedDialog::new(true, None));

    let err = h
        .controller
        .submit_new(fields("   ", "Lee", "09:00", "17:00"))
        .await
        .expect_err("blank first name");

    assert!(matches!(err, ClientError::Invalid(_)));
    assert_eq!(h.transport.call_count(), 0);
    assert!(matches!(
        h.notifier.notices().as_slice(),
        [Notice::Error { .. }]
    ));
}

#[tokio::test]
async fn debug_actions_refresh_and_toast() {
    let h = harness(ScriptedDialog::new(true, None));
    h.transport.push_body("{}");
    h.transport.push_body(list_body(&[
        employee_json(1, "Ann", "Lee", "09:00", "17:00"),
        employee_json(2, "Bo", "Kim", "12:00", "20:00"),
    ]));

    h.controller
        .run_debug(DebugAction::SeedTestEmployees)
        .await
        .expect("seed");

    assert_eq!(
        h.transport.routes(),
        vec![
            Route::debug(DebugAction::SeedTestEmployees),
            Route::list_employees()
        ]
    );
    assert!(h
        .notifier
        .notices()
        .contains(&Notice::Toast(DEBUG_SUCCESS_MESSAGE.to_string())));
}

#[tokio::test]
async fn rerender_reloads_the_list() {
    let h = harness(ScriptedDialog::new(true, None));
    h.transport.push_body(list_body(&[]));

    h.controller.rerender().await;

    assert_eq!(h.transport.routes(), vec![Route::list_employees()]);
    assert_eq!(
        h.notifier.notices(),
        vec![Notice::Toast(DEBUG_SUCCESS_MESSAGE.to_string())]
    );
}
