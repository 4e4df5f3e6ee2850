pub mod users;

pub use users::{
    CreateUserRequest, MessageResponse, UpdateUserRequest, UserListResponse, UserResponse,
};
