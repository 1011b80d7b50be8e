//! Request/response DTOs for the REST API.

pub mod availability_dto;
pub mod booking_dto;
pub mod common_dto;
pub mod event_dto;
pub mod notification_dto;

pub use availability_dto::{AvailabilityDto, CreateAvailabilityRequest, UpdateAvailabilityRequest};
pub use booking_dto::{BookingRequestResponse, CreateBookingRequest, SlotsQuery, SlotsResponse};
pub use common_dto::UserQuery;
pub use event_dto::{CreateEventRequest, UpdateEventRequest};
pub use notification_dto::{MarkAllReadRequest, ReadAllResponse, ReadResponse, RespondRequest};
