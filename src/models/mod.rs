// ============================================================================
// MODELS - entry point
// ============================================================================
//
// One module per table, all mapped with SeaORM:
//   - users               : collaborators (CPF natural key, active flag)
//   - roles               : access levels, unique name
//   - manufacturers       : vehicle manufacturer catalog, unique name
//   - vehicle_models      : vehicle model catalog, many-to-one manufacturer
//   - vehicles            : fleet vehicles, owned by a user
//   - verification_tokens : single-use account activation tokens
//   - dto                 : request/response shapes for the API
//
// Relations between tables are declared in each module; back-references
// (role -> users, manufacturer -> models, user -> vehicles) are resolved
// with on-demand queries in the services.
//
// ============================================================================

pub mod dto;
pub mod manufacturers;
pub mod roles;
pub mod users;
pub mod vehicle_models;
pub mod vehicles;
pub mod verification_tokens;
