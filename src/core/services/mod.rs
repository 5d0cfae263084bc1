//! 核心服务层

pub mod supabase;

pub use supabase::SupabaseClient;
