//! Reservation HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};

use crate::application::{AvailabilityResolver, NewReservation, ReservationHistory, ReservationWriter};
use crate::domain::{DomainError, ReservationFilter};
use crate::interfaces::http::common::{ApiError, ApiResponse, SessionContext, ValidatedJson};

use super::dto::*;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationAppState {
    pub resolver: Arc<AvailabilityResolver>,
    pub writer: Arc<ReservationWriter>,
    pub history: Arc<ReservationHistory>,
    /// Current instant; swapped for a fixed clock in tests
    pub clock: fn() -> DateTime<Utc>,
}

impl ReservationAppState {
    pub fn new(
        resolver: Arc<AvailabilityResolver>,
        writer: Arc<ReservationWriter>,
        history: Arc<ReservationHistory>,
    ) -> Self {
        Self {
            resolver,
            writer,
            history,
            clock: Utc::now,
        }
    }
}

fn required<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError(DomainError::InvalidArgument(format!("{field} is required"))))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/availability",
    tag = "Reservations",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Every slot of the date with its remaining tables", body = ApiResponse<AvailabilityDto>),
        (status = 400, description = "Missing or malformed date"),
        (status = 503, description = "Reservation store unavailable")
    )
)]
pub async fn get_availability(
    State(state): State<ReservationAppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityDto>>, ApiError> {
    let date = parse_date("date", required("date", &query.date)?)?;
    let slots = state.resolver.list_slots(date).await?;

    Ok(Json(ApiResponse::success(AvailabilityDto {
        date,
        slots: slots.into_iter().map(TimeSlotDto::from).collect(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/next-available",
    tag = "Reservations",
    params(NextAvailableQuery),
    responses(
        (status = 200, description = "Earliest slot with a free table, or a none-found label", body = ApiResponse<NextAvailableDto>),
        (status = 400, description = "Malformed search origin"),
        (status = 503, description = "Reservation store unavailable")
    )
)]
pub async fn get_next_available(
    State(state): State<ReservationAppState>,
    Query(query): Query<NextAvailableQuery>,
) -> Result<Json<ApiResponse<NextAvailableDto>>, ApiError> {
    let now = (state.clock)();
    let from = match query.from.as_deref() {
        Some(raw) => parse_instant("from", raw)?,
        None => now,
    };

    let next = state.resolver.next_available(from, now).await?;
    Ok(Json(ApiResponse::success(next.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/tables",
    tag = "Reservations",
    params(TablesQuery),
    responses(
        (status = 200, description = "Free and taken tables of the slot", body = ApiResponse<SlotTablesDto>),
        (status = 400, description = "Missing, malformed or misaligned slot start"),
        (status = 503, description = "Reservation store unavailable")
    )
)]
pub async fn get_tables(
    State(state): State<ReservationAppState>,
    Query(query): Query<TablesQuery>,
) -> Result<Json<ApiResponse<SlotTablesDto>>, ApiError> {
    let slot_start = parse_instant("slotStart", required("slotStart", &query.slot_start)?)?;
    let tables = state.resolver.tables_for(slot_start).await?;
    Ok(Json(ApiResponse::success(tables.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    params(("X-User-Id" = Option<String>, Header, description = "Storefront user making the booking")),
    responses(
        (status = 201, description = "Table reserved", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Unknown table, misaligned or past slot"),
        (status = 409, description = "Table already reserved for this slot"),
        (status = 422, description = "Validation error"),
        (status = 503, description = "Reservation store unavailable")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    session: SessionContext,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let reservation = state
        .writer
        .reserve(
            NewReservation {
                slot_start: request.slot_start,
                table_number: request.table_number,
                order_id: request.order_id,
                user_id: request.user_id.or(session.user_id),
            },
            (state.clock)(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(reservation.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    params(ReservationListQuery),
    responses(
        (status = 200, description = "Stored reservations ordered by slot and table", body = ApiResponse<Vec<ReservationDto>>),
        (status = 400, description = "Malformed date")
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationAppState>,
    Query(query): Query<ReservationListQuery>,
) -> Result<Json<ApiResponse<Vec<ReservationDto>>>, ApiError> {
    let date = query
        .date
        .as_deref()
        .map(|raw| parse_date("date", raw))
        .transpose()?;

    let reservations = state
        .history
        .list(ReservationFilter {
            date,
            user_id: query.user_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(ReservationDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    params(("reservation_id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    Path(reservation_id): Path<i32>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let reservation = state.history.get(reservation_id).await?;
    Ok(Json(ApiResponse::success(reservation.into())))
}
