//! Well-known record-type and attribute names from the directory protocol.

/// Standard user records.
pub const RECORD_TYPE_USERS: &str = "dsRecTypeStandard:Users";
/// Standard group records.
pub const RECORD_TYPE_GROUPS: &str = "dsRecTypeStandard:Groups";
/// Standard resource records.
pub const RECORD_TYPE_RESOURCES: &str = "dsRecTypeStandard:Resources";

/// Globally unique record identifier.
pub const ATTR_GENERATED_UID: &str = "dsAttrTypeStandard:GeneratedUID";
/// Routing hint naming the node that owns a record's authentication.
pub const ATTR_META_NODE_LOCATION: &str = "dsAttrTypeStandard:AppleMetaNodeLocation";
/// Display ("real") name; also the selector attribute for compound queries.
pub const ATTR_REAL_NAME: &str = "dsAttrTypeStandard:RealName";
/// Last-modification timestamp.
pub const ATTR_MODIFICATION_TIMESTAMP: &str = "dsAttrTypeStandard:ModificationTimestamp";
/// Calendar principal URI carried on calendar-enabled records.
pub const ATTR_CALENDAR_PRINCIPAL_URI: &str = "dsAttrTypeStandard:CalendarPrincipalURI";
