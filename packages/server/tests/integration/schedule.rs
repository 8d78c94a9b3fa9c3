use crate::common::{LogCapture, Submission, TestApp, routes};

#[tokio::test]
async fn confirm_saves_and_redirects_to_listing() {
    let app = TestApp::spawn().await;

    let res = app
        .post_form(
            routes::CONFIRM,
            &[
                ("name", "Ada"),
                ("grade", "10"),
                ("schedule", "Mon 08:00 Math"),
            ],
        )
        .await;

    assert_eq!(res.status, 303, "{}", res.text);
    assert_eq!(res.location.as_deref(), Some("/schedules"));

    let list = app.get(routes::SCHEDULES).await;
    assert_eq!(list.status, 200);
    assert_eq!(list.body["total"], 1);
    let row = &list.body["schedules"][0];
    assert_eq!(row["name"], "Ada");
    assert_eq!(row["schedule"], "Mon 08:00 Math");
    assert!(row["image_hash"].is_null());
}

#[tokio::test]
async fn verify_then_confirm_keeps_image_reference() {
    let app = TestApp::spawn().await;

    let verified = app
        .submit(
            routes::VERIFY,
            Submission::complete("Ada", "10", "week.png", b"PNG_DATA"),
        )
        .await;
    assert_eq!(verified.status, 200, "{}", verified.text);
    let hash = verified.body["image_hash"].as_str().unwrap().to_string();
    let schedule = verified.body["schedule"].as_str().unwrap().to_string();

    let res = app
        .post_form(
            routes::CONFIRM,
            &[
                ("name", "Ada"),
                ("grade", "10"),
                ("schedule", &schedule),
                ("image_hash", &hash),
            ],
        )
        .await;
    assert_eq!(res.status, 303, "{}", res.text);

    let list = app.get(routes::SCHEDULES).await;
    assert_eq!(list.body["schedules"][0]["image_hash"], hash.as_str());
}

#[tokio::test]
async fn confirm_rejects_unknown_image_hash() {
    let app = TestApp::spawn().await;
    let unknown = "ab".repeat(32);

    let res = app
        .post_form(
            routes::CONFIRM,
            &[
                ("name", "Ada"),
                ("grade", "10"),
                ("schedule", "Mon"),
                ("image_hash", &unknown),
            ],
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.message(), "Unknown image hash");

    let res = app
        .post_form(
            routes::CONFIRM,
            &[
                ("name", "Ada"),
                ("grade", "10"),
                ("schedule", "Mon"),
                ("image_hash", "not-a-hash"),
            ],
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.message(), "Invalid image hash");
}

#[tokio::test]
async fn confirm_validates_fields() {
    let app = TestApp::spawn().await;

    let empty_schedule = app
        .post_form(
            routes::CONFIRM,
            &[("name", "Ada"), ("grade", "10"), ("schedule", "   ")],
        )
        .await;
    assert_eq!(empty_schedule.status, 400);
    assert_eq!(empty_schedule.message(), "Schedule is required");

    let empty_name = app
        .post_form(
            routes::CONFIRM,
            &[("name", ""), ("grade", "10"), ("schedule", "Mon")],
        )
        .await;
    assert_eq!(empty_name.status, 400);
    assert_eq!(empty_name.message(), "Name is required");

    let missing_field = app
        .post_form(routes::CONFIRM, &[("name", "Ada"), ("grade", "10")])
        .await;
    assert_eq!(missing_field.status, 400);
    assert_eq!(missing_field.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_schedule_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::schedule(999)).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.message(), "Schedule not found");
}

#[tokio::test]
async fn index_serves_upload_form() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::INDEX).await;

    assert_eq!(res.status, 200);
    assert!(res.text.contains("id=\"scheduleForm\""));
    assert!(res.text.contains("name=\"scheduleImage\""));
}

#[tokio::test]
async fn openapi_document_lists_intake_routes() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::OPENAPI).await;

    assert_eq!(res.status, 200);
    for path in ["/verify", "/upload", "/confirm", "/schedules", "/schedules/{id}"] {
        assert!(res.body["paths"].get(path).is_some(), "missing {path}");
    }
}

#[tokio::test]
async fn confirm_logs_schedule_id_without_student_name() {
    let logs = LogCapture::default();
    let _guard = logs.install();
    let app = TestApp::spawn().await;

    let res = app
        .post_form(
            routes::CONFIRM,
            &[
                ("name", "Zebulon Quarrington"),
                ("grade", "10"),
                ("schedule", "Mon 08:00 Math"),
            ],
        )
        .await;
    assert_eq!(res.status, 303, "{}", res.text);

    let output = logs.contents();
    assert!(output.contains("Schedule confirmed"), "{output}");
    assert!(output.contains("schedule_id=1"), "{output}");
    assert!(!output.contains("Zebulon"), "{output}");
}
