//! The request shapes the dispatcher understands and the responses it returns.

use strum::EnumDiscriminants;

use crate::domain::{Activity, ActivityDraft, ActivityId, UserId};

/// Every activity, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListActivities;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDetails {
    pub id: ActivityId,
}

/// Create an activity hosted by `creator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateActivity {
    pub draft: ActivityDraft,
    pub creator: UserId,
}

/// Merge `draft` onto the activity with `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditActivity {
    pub id: ActivityId,
    pub draft: ActivityDraft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteActivity {
    pub id: ActivityId,
}

/// Toggle `user`'s attendance of the activity with `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAttendance {
    pub id: ActivityId,
    pub user: UserId,
}

/// Any request the dispatcher can route. [`RequestKind`] is its discriminant
/// and the registry key.
#[derive(Debug, Clone, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(RequestKind), derive(Hash, strum::Display, strum::EnumIter))]
pub enum Request {
    List(ListActivities),
    Details(ActivityDetails),
    Create(CreateActivity),
    Edit(EditActivity),
    Delete(DeleteActivity),
    UpdateAttendance(UpdateAttendance),
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        self.into()
    }
}

/// Untyped success payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Activities(Vec<Activity>),
    Activity(Activity),
    Unit,
}

/// A value a handler can produce, convertible to and from [`Response`].
pub trait Output: Sized + Send + 'static {
    fn into_response(self) -> Response;
    fn from_response(response: Response) -> Option<Self>;
}

impl Output for Vec<Activity> {
    fn into_response(self) -> Response {
        Response::Activities(self)
    }

    fn from_response(response: Response) -> Option<Self> {
        match response {
            Response::Activities(activities) => Some(activities),
            _ => None,
        }
    }
}

impl Output for Activity {
    fn into_response(self) -> Response {
        Response::Activity(self)
    }

    fn from_response(response: Response) -> Option<Self> {
        match response {
            Response::Activity(activity) => Some(activity),
            _ => None,
        }
    }
}

impl Output for () {
    fn into_response(self) -> Response {
        Response::Unit
    }

    fn from_response(response: Response) -> Option<Self> {
        match response {
            Response::Unit => Some(()),
            _ => None,
        }
    }
}

/// Ties a concrete request type to its [`Request`] variant and output type.
pub trait RequestShape: Sized + Send + Sync + 'static {
    const KIND: RequestKind;
    type Output: Output;

    fn into_request(self) -> Request;
    fn from_request(request: Request) -> Option<Self>;
    fn as_shape(request: &Request) -> Option<&Self>;
}

macro_rules! request_shape {
    ($shape:ty, $variant:ident, $output:ty) => {
        impl RequestShape for $shape {
            const KIND: RequestKind = RequestKind::$variant;
            type Output = $output;

            fn into_request(self) -> Request {
                Request::$variant(self)
            }

            fn from_request(request: Request) -> Option<Self> {
                match request {
                    Request::$variant(shape) => Some(shape),
                    _ => None,
                }
            }

            fn as_shape(request: &Request) -> Option<&Self> {
                match request {
                    Request::$variant(shape) => Some(shape),
                    _ => None,
                }
            }
        }

        impl From<$shape> for Request {
            fn from(shape: $shape) -> Self {
                Request::$variant(shape)
            }
        }
    };
}

request_shape!(ListActivities, List, Vec<Activity>);
request_shape!(ActivityDetails, Details, Activity);
request_shape!(CreateActivity, Create, ());
request_shape!(EditActivity, Edit, ());
request_shape!(DeleteActivity, Delete, ());
request_shape!(UpdateAttendance, UpdateAttendance, ());
