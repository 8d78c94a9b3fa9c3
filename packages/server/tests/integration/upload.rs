use crate::common::{Submission, TestApp, routes};

#[tokio::test]
async fn upload_saves_schedule_and_reports_message() {
    let app = TestApp::spawn().await;

    let res = app
        .submit(
            routes::UPLOAD,
            Submission::complete("Grace", "11", "week.jpeg", b"JPEG"),
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.message(), "Schedule saved for Grace");
    let id = res.body["id"].as_i64().expect("id should be present");

    let saved = app.get(&routes::schedule(id)).await;
    assert_eq!(saved.status, 200);
    assert_eq!(saved.body["name"], "Grace");
    assert_eq!(saved.body["grade"], "11");
    assert_eq!(saved.body["schedule"], "MON 08:00 MATH\nMON 09:00 ART");
    assert!(saved.body["image_hash"].is_string());
}

#[tokio::test]
async fn upload_without_image_answers_with_message() {
    let app = TestApp::spawn().await;

    let res = app
        .submit(
            routes::UPLOAD,
            Submission {
                name: Some("Grace"),
                grade: Some("11"),
                image: None,
            },
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.message(), "Please upload a schedule image");
}

#[tokio::test]
async fn upload_checks_identity_before_image() {
    let app = TestApp::spawn().await;

    let res = app
        .submit(
            routes::UPLOAD,
            Submission {
                name: Some("Grace"),
                grade: Some(""),
                image: None,
            },
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.message(), "Please select your grade");
}

#[tokio::test]
async fn identical_images_are_stored_once() {
    let app = TestApp::spawn().await;

    let first = app
        .submit(
            routes::UPLOAD,
            Submission::complete("Grace", "11", "a.png", b"SAME"),
        )
        .await;
    let second = app
        .submit(
            routes::UPLOAD,
            Submission::complete("Alan", "12", "b.png", b"SAME"),
        )
        .await;
    assert_eq!(first.status, 201);
    assert_eq!(second.status, 201);
    assert_ne!(first.body["id"], second.body["id"]);

    assert_eq!(app.stored_image_count(), 1);

    let list = app.get(routes::SCHEDULES).await;
    let schedules = list.body["schedules"].as_array().unwrap();
    assert_eq!(schedules.len(), 2);
    assert_eq!(schedules[0]["image_hash"], schedules[1]["image_hash"]);
}
