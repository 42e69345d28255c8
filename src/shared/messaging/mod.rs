//! Messaging Module
//!
//! JSON shapes exchanged with clients. Field names are camelCase on the
//! wire (`uId`, `channelId`, `handleStr`, ...).
//!
//! - `UserProfile` - The public view of a user
//! - `ChannelSummary` / `ChannelDetails` - Channel listings and details
//! - `DmSummary` / `DmDetails` - DM listings and details
//! - `MessageView` - A message as seen by one viewer
//! - `Notification` - One entry of a user's notification feed
//! - `UserStats` / `WorkspaceStats` - Involvement and utilization series

pub mod user;
pub mod channel;
pub mod dm;
pub mod message;
pub mod notification;
pub mod standup;
pub mod stats;

use serde::{Deserialize, Serialize};

pub use user::{
    SetEmailRequest, SetHandleRequest, SetNameRequest, UploadPhotoRequest, UserProfile,
    UserProfileResponse, UserQuery, UsersAllResponse,
};
pub use channel::{
    ChannelDetails, ChannelIdRequest, ChannelMemberRequest, ChannelMessagesQuery, ChannelQuery,
    ChannelSummary, ChannelsCreateRequest, ChannelsCreateResponse, ChannelsListResponse,
};
pub use dm::{
    DmCreateRequest, DmCreateResponse, DmDetails, DmIdRequest, DmListResponse, DmMessagesQuery,
    DmQuery, DmSummary,
};
pub use message::{
    EditMessageRequest, MessageIdRequest, MessageQuery, MessageView, MessagesPage, ReactRequest,
    ReactView, SearchQuery, SearchResponse, SendDmRequest, SendLaterDmRequest, SendLaterRequest,
    SendMessageRequest, SendMessageResponse, ShareMessageRequest, ShareMessageResponse,
};
pub use notification::{Notification, NotificationsResponse};
pub use standup::{
    StandupActiveResponse, StandupSendRequest, StandupStartRequest, StandupStartResponse,
};
pub use stats::{
    ChannelsExistPoint, ChannelsJoinedPoint, DmsExistPoint, DmsJoinedPoint, MessagesExistPoint,
    MessagesSentPoint, UserStats, UserStatsResponse, WorkspaceStats, WorkspaceStatsResponse,
};

/// Body returned by operations that have nothing to report: `{}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmptyResponse {}
