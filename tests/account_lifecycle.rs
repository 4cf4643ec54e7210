mod common;

use chrono::Duration;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use fleetcare_backend::error::ServiceError;
use fleetcare_backend::models::dto::{RoleRequest, UpdateUserRequest, VehicleRequest};
use fleetcare_backend::models::{users, vehicles, verification_tokens};
use fleetcare_backend::services::role_service::RoleService;
use fleetcare_backend::services::user_service::UserService;
use fleetcare_backend::services::vehicle_service::VehicleService;
use fleetcare_backend::services::verification_service::{
    RedeemOutcome, TOKEN_VALIDITY_MS, VerificationService,
};

use common::{CPF_PRIMARY, CPF_SECONDARY, now, register_user, registration};

#[tokio::test]
async fn registration_stores_normalized_fields_and_an_inactive_account() {
    let db = common::setup_db().await;
    let (user, token) = register_user(&db, "529.982.247-25", "Fulano.DETAL@Email.com ").await;

    assert!(!user.active);
    assert_eq!(user.version, 0);
    assert_eq!(user.cpf, CPF_PRIMARY);
    assert_eq!(user.email, "fulano.detal@email.com");
    assert_eq!(user.name, "Fulano");
    assert_eq!(user.surname, "De Tal");
    assert_eq!(user.birth_date, "01011990");
    assert_eq!(user.phone, "21998765432");
    assert!(Uuid::parse_str(&token).is_ok());
}

#[tokio::test]
async fn registration_rejects_a_bad_cpf_checksum() {
    let db = common::setup_db().await;
    let result = UserService::register(
        &db,
        registration("52998224724", "fulano@email.com"),
        Uuid::new_v4(),
        now(),
    )
    .await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn registration_rejects_duplicate_cpf_and_email() {
    let db = common::setup_db().await;
    register_user(&db, CPF_PRIMARY, "fulano@email.com").await;

    let same_cpf = UserService::register(
        &db,
        registration(CPF_PRIMARY, "outro@email.com"),
        Uuid::new_v4(),
        now(),
    )
    .await;
    assert!(matches!(same_cpf, Err(ServiceError::UniqueViolation("CPF"))));

    let same_email = UserService::register(
        &db,
        registration(CPF_SECONDARY, "FULANO@email.com"),
        Uuid::new_v4(),
        now(),
    )
    .await;
    assert!(matches!(same_email, Err(ServiceError::UniqueViolation("email"))));
}

#[tokio::test]
async fn renewing_a_token_reuses_the_existing_row() {
    let db = common::setup_db().await;
    let (user, first_token) = register_user(&db, CPF_PRIMARY, "fulano@email.com").await;

    let first_row = VerificationService::find_for_user(&db, user.id)
        .await
        .expect("lookup")
        .expect("token row after registration");

    let second_token = VerificationService::issue_or_renew(&db, user.id, Uuid::new_v4(), now())
        .await
        .expect("renewal");
    assert_ne!(first_token, second_token);

    let rows = verification_tokens::Entity::find()
        .filter(verification_tokens::Column::UserId.eq(user.id))
        .count(&db)
        .await
        .expect("count");
    assert_eq!(rows, 1);

    let second_row = VerificationService::find_for_user(&db, user.id)
        .await
        .expect("lookup")
        .expect("token row after renewal");
    assert_eq!(first_row.id, second_row.id);
    assert_eq!(second_row.token, second_token);
}

#[tokio::test]
async fn redeeming_before_expiry_activates_and_burns_the_token() {
    let db = common::setup_db().await;
    let issued_at = now();
    let (user, token) = register_user(&db, CPF_PRIMARY, "fulano@email.com").await;
    let code = Uuid::parse_str(&token).expect("token is a uuid");

    let outcome = VerificationService::redeem(&db, code, issued_at + Duration::minutes(5))
        .await
        .expect("redeem");
    assert_eq!(outcome, RedeemOutcome::Activated);

    let user = UserService::find_by_id(&db, user.id).await.expect("reload");
    assert!(user.active);
    assert_eq!(user.version, 1);

    // The token is single-use.
    let again = VerificationService::redeem(&db, code, issued_at + Duration::minutes(6))
        .await
        .expect("second redeem");
    assert_eq!(again, RedeemOutcome::NotFound);
}

#[tokio::test]
async fn redeeming_after_expiry_burns_the_token_without_activating() {
    let db = common::setup_db().await;
    let issued_at = now();
    let (user, token) = register_user(&db, CPF_PRIMARY, "fulano@email.com").await;
    let code = Uuid::parse_str(&token).expect("token is a uuid");

    let too_late = issued_at + Duration::milliseconds(TOKEN_VALIDITY_MS) + Duration::minutes(1);
    let outcome = VerificationService::redeem(&db, code, too_late).await.expect("redeem");
    assert_eq!(outcome, RedeemOutcome::Expired);

    let user = UserService::find_by_id(&db, user.id).await.expect("reload");
    assert!(!user.active);

    // Expired tokens are removed too; a fresh one must be requested.
    let row = VerificationService::find_for_user(&db, user.id).await.expect("lookup");
    assert!(row.is_none());
}

#[tokio::test]
async fn redeeming_an_unknown_token_reports_not_found() {
    let db = common::setup_db().await;
    let outcome = VerificationService::redeem(&db, Uuid::new_v4(), now())
        .await
        .expect("redeem");
    assert_eq!(outcome, RedeemOutcome::NotFound);
}

#[tokio::test]
async fn update_with_a_stale_version_is_rejected_without_writing() {
    let db = common::setup_db().await;
    let (user, _) = register_user(&db, CPF_PRIMARY, "fulano@email.com").await;

    let request = |surname: &str| UpdateUserRequest {
        id: user.id,
        name: "Fulano".to_string(),
        surname: surname.to_string(),
        email: "fulano@email.com".to_string(),
        birth_date: "01/01/1990".to_string(),
        phone: "21998765432".to_string(),
        gender: None,
        role_id: None,
        version: 0,
    };

    let updated = UserService::update(&db, request("Primeiro")).await.expect("first update");
    assert_eq!(updated.version, 1);
    assert_eq!(updated.surname, "Primeiro");

    // Same version presented again: a concurrent edit happened in between.
    let stale = UserService::update(&db, request("Segundo")).await;
    assert!(matches!(stale, Err(ServiceError::StaleState("user"))));

    let reloaded = UserService::find_by_id(&db, user.id).await.expect("reload");
    assert_eq!(reloaded.surname, "Primeiro");
    assert_eq!(reloaded.version, 1);
}

#[tokio::test]
async fn deleting_a_role_detaches_its_holders() {
    let db = common::setup_db().await;
    let role = RoleService::create(&db, RoleRequest { name: "gerentes".to_string() })
        .await
        .expect("role");
    assert_eq!(role.name, "Gerentes");

    let (first, _) = register_user(&db, CPF_PRIMARY, "fulano@email.com").await;
    let (second, _) = register_user(&db, CPF_SECONDARY, "beltrano@email.com").await;
    for user in [&first, &second] {
        UserService::update(
            &db,
            UpdateUserRequest {
                id: user.id,
                name: user.name.clone(),
                surname: user.surname.clone(),
                email: user.email.clone(),
                birth_date: user.birth_date.clone(),
                phone: user.phone.clone(),
                gender: None,
                role_id: Some(role.id),
                version: user.version,
            },
        )
        .await
        .expect("assign role");
    }

    let detached = RoleService::delete(&db, role.id).await.expect("delete role");
    assert_eq!(detached, 2);

    for id in [first.id, second.id] {
        let user = UserService::find_by_id(&db, id).await.expect("holder survives");
        assert_eq!(user.role_id, None);
        assert_eq!(user.version, 2);
    }
    let gone = RoleService::find_by_id(&db, role.id).await;
    assert!(matches!(gone, Err(ServiceError::NotFound("role"))));
}

#[tokio::test]
async fn deleting_a_user_removes_their_token_and_vehicles() {
    let db = common::setup_db().await;
    let (user, _) = register_user(&db, CPF_PRIMARY, "fulano@email.com").await;
    let vehicle = VehicleService::create(
        &db,
        VehicleRequest {
            plate: "ABC1D23".to_string(),
            year: "2020".to_string(),
            model_id: None,
            user_id: user.id,
        },
    )
    .await
    .expect("vehicle");

    UserService::delete(&db, user.id).await.expect("delete user");

    assert!(matches!(
        UserService::find_by_id(&db, user.id).await,
        Err(ServiceError::NotFound("user"))
    ));
    let orphan = vehicles::Entity::find_by_id(vehicle.id).one(&db).await.expect("query");
    assert!(orphan.is_none());
    let token_row = verification_tokens::Entity::find()
        .filter(verification_tokens::Column::UserId.eq(user.id))
        .one(&db)
        .await
        .expect("query");
    assert!(token_row.is_none());
}

#[tokio::test]
async fn change_password_verifies_the_current_one() {
    let db = common::setup_db().await;
    let (user, _) = register_user(&db, CPF_PRIMARY, "fulano@email.com").await;

    let wrong = UserService::change_password(&db, user.id, "errada", "Outra@Senha1").await;
    assert!(matches!(wrong, Err(ServiceError::Validation(_))));

    UserService::change_password(&db, user.id, common::STRONG_PASSWORD, "Outra@Senha1")
        .await
        .expect("password change");

    let weak = UserService::change_password(&db, user.id, "Outra@Senha1", "fraca").await;
    assert!(matches!(weak, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn bootstrap_seed_is_idempotent() {
    let db = common::setup_db().await;
    fleetcare_backend::services::bootstrap::seed(&db).await.expect("first seed");
    fleetcare_backend::services::bootstrap::seed(&db).await.expect("second seed");

    let roles = RoleService::list(&db, true).await.expect("roles");
    assert_eq!(roles.len(), 2);

    let admins = users::Entity::find()
        .filter(users::Column::Email.eq("admin@fleetcare.com"))
        .count(&db)
        .await
        .expect("count");
    assert_eq!(admins, 1);

    let admin = UserService::find_by_cpf(&db, "53376207704").await.expect("default admin");
    assert!(admin.active);
}
