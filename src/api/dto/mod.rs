//! Request/response DTOs for every endpoint, organized by resource.

pub mod archive_dto;
pub mod auth_dto;
pub mod common_dto;
pub mod dashboard_dto;
pub mod extract_dto;
pub mod group_dto;
pub mod notification_dto;
pub mod transaction_dto;

pub use archive_dto::{
    ArchivedTransactionDto, ArchivedTransactionListResponse, DeletedTransactionDto,
    DeletedTransactionListResponse,
};
pub use auth_dto::{
    AuthResponse, GoogleCallbackRequest, GoogleUrlResponse, LoginRequest, RefreshRequest,
    RegisterRequest, UserDto,
};
pub use common_dto::{MessageResponse, PaginationMeta, PaginationParams};
pub use dashboard_dto::{
    DashboardStatsResponse, GroupSummariesResponse, RecentQuery, RecentTransactionsResponse,
};
pub use extract_dto::{ExtractRequest, ExtractResponse, ExtractedTransactionDto};
pub use group_dto::{
    AddMemberRequest, CreateGroupRequest, DeleteGroupResponse, GroupDto, GroupListResponse,
    GroupStatsResponse, InviteRequest, MemberDto, MemberListResponse, UpdateGroupRequest,
};
pub use notification_dto::{
    AcceptInvitationResponse, MarkAllReadResponse, NotificationDto, NotificationListResponse,
    UnreadCountResponse, UnreadFilter,
};
pub use transaction_dto::{
    BulkTransactionsRequest, BulkTransactionsResponse, CreateTransactionRequest,
    ImportCsvRequest, TransactionDto, TransactionListResponse, TransactionListQuery,
};
