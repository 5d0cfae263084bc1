//! 核心数据模型

mod team;
mod truck;
mod user;

pub use team::{NewTeam, Team, TeamInput, TeamType};
pub use truck::{NewTruck, Truck, TruckInput};
pub use user::{AuthUser, LoginRequest, LoginResponse, Profile, ADMIN_ROLE};
