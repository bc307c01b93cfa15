use std::time::{Duration, Instant};

use claims::{assert_err, assert_matches, assert_ok};
use fake::Fake;
use status_probe::{
    errors::{ConnectionKind, ProbeError},
    features::health_check::{
        check, domain::ProbeTarget, probe::MAX_REPORT_BYTES, HealthProbe, Probe,
    },
};
use wiremock::ResponseTemplate;

use crate::helpers::{healthy, refused_target, spawn_service, unhealthy};

#[tokio::test]
pub async fn a_healthy_service_passes_the_check() {
    // arrange
    let service = spawn_service().await;
    service.respond_with(healthy(), 1).await;

    // act
    let result = service.probe(200).await;

    // assert
    assert_ok!(result);
}

#[tokio::test]
pub async fn an_unavailable_service_fails_with_503_and_200() {
    // arrange
    let service = spawn_service().await;
    service.respond_with(ResponseTemplate::new(503), 1).await;

    // act
    let result = service.probe(200).await;

    // assert
    assert_matches!(
        result,
        Err(ProbeError::UnexpectedStatus { actual, expected, details: None })
            if actual.as_u16() == 503 && expected.as_u16() == 200
    );
}

#[tokio::test]
pub async fn the_actual_status_is_reported_for_any_unexpected_code() {
    // arrange
    let service = spawn_service().await;
    let status: u16 = (201..600).fake();
    service.respond_with(ResponseTemplate::new(status), 1).await;

    // act
    let result = service.probe(200).await;

    // assert
    assert_matches!(
        result,
        Err(ProbeError::UnexpectedStatus { actual, .. }) if actual.as_u16() == status
    );
}

#[tokio::test]
pub async fn details_from_the_service_are_attached_to_the_failure() {
    // arrange
    let service = spawn_service().await;
    service
        .respond_with(unhealthy("PostgreSQL connection failed"), 1)
        .await;

    // act
    let err = assert_err!(service.probe(200).await);

    // assert
    assert_matches!(
        &err,
        ProbeError::UnexpectedStatus { details: Some(d), .. } if d == "PostgreSQL connection failed"
    );
    assert!(err.to_string().contains("PostgreSQL connection failed"));
}

#[tokio::test]
pub async fn a_non_json_body_is_ignored() {
    // arrange
    let service = spawn_service().await;
    service
        .respond_with(ResponseTemplate::new(500).set_body_string("<h1>oops</h1>"), 1)
        .await;

    // act
    let result = service.probe(200).await;

    // assert
    assert_matches!(result, Err(ProbeError::UnexpectedStatus { details: None, .. }));
}

#[tokio::test]
pub async fn an_oversized_body_is_not_read_for_details() {
    // arrange
    let service = spawn_service().await;
    let details = "x".repeat(MAX_REPORT_BYTES * 2);
    service.respond_with(unhealthy(&details), 1).await;

    // act
    let result = service.probe(200).await;

    // assert
    assert_matches!(
        result,
        Err(ProbeError::UnexpectedStatus { actual, details: None, .. }) if actual.as_u16() == 503
    );
}

#[tokio::test]
pub async fn a_custom_expected_status_is_honoured() {
    // arrange
    let service = spawn_service().await;
    service.respond_with(ResponseTemplate::new(418), 2).await;

    // act
    let teapot = service.probe(418).await;
    let ok = service.probe(200).await;

    // assert
    assert_ok!(teapot);
    assert_matches!(
        ok,
        Err(ProbeError::UnexpectedStatus { actual, expected, .. })
            if actual.as_u16() == 418 && expected.as_u16() == 200
    );
}

#[tokio::test]
pub async fn redirects_are_not_followed() {
    // arrange
    let service = spawn_service().await;
    service
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/elsewhere"),
            1,
        )
        .await;

    // act
    let result = service.probe(200).await;

    // assert
    assert_matches!(
        result,
        Err(ProbeError::UnexpectedStatus { actual, .. }) if actual.as_u16() == 302
    );
}

#[tokio::test]
pub async fn a_refused_connection_fails_with_a_connection_error() {
    // arrange
    let target = refused_target();

    // act
    let result = check(&target, 200, Duration::from_secs(2)).await;

    // assert
    assert_matches!(
        result,
        Err(ProbeError::ConnectionError { kind: ConnectionKind::Connect, .. })
    );
}

#[tokio::test]
pub async fn a_dns_failure_fails_with_a_connection_error() {
    // arrange
    let target = ProbeTarget::parse("http://no-such-host.invalid/api/status/health")
        .expect("Failed to parse probe target.");

    // act
    let result = check(&target, 200, Duration::from_secs(3)).await;

    // assert
    assert_matches!(
        result,
        Err(ProbeError::ConnectionError { kind: ConnectionKind::Connect, .. })
    );
}

#[tokio::test]
pub async fn a_slow_service_fails_within_the_timeout() {
    // arrange
    let service = spawn_service().await;
    service
        .respond_with(healthy().set_delay(Duration::from_secs(5)), 1)
        .await;
    let probe = HealthProbe::new(200, Duration::from_millis(200)).expect("Failed to build probe.");

    // act
    let started = Instant::now();
    let result = probe.check(&service.target).await;

    // assert
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_matches!(
        result,
        Err(ProbeError::ConnectionError { kind: ConnectionKind::Timeout, .. })
    );
}

#[tokio::test]
pub async fn repeated_checks_against_a_healthy_service_all_pass() {
    // arrange
    let service = spawn_service().await;
    service.respond_with(healthy(), 3).await;
    let probe = HealthProbe::new(200, Duration::from_secs(2)).expect("Failed to build probe.");

    for _ in 0..3 {
        // act
        let result = probe.check(&service.target).await;

        // assert
        assert_ok!(result);
    }
}
