/// Generates `get_<entity>` and `create_<entity>` on a client that wraps a
/// `ResourceClient` in `$field`. The error type needs `ValidationError` and
/// `ActorCommunicationError` variants.
macro_rules! impl_client_methods {
    ($client_name:ident, $field:ident: $entity:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](
                    &self,
                    id: <$entity as crate::actor_framework::Entity>::Id,
                ) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.$field.get(id).await.map_err(|e| <$error>::ActorCommunicationError(e.to_string()))
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<create_ $entity_name_snake>](
                    &self,
                    payload: <$entity as crate::actor_framework::Entity>::CreatePayload,
                ) -> Result<<$entity as crate::actor_framework::Entity>::Id, $error> {
                    tracing::debug!("Sending request");
                    self.$field.create(payload).await.map_err(|e| match e {
                        crate::actor_framework::FrameworkError::Rejected(reason) => <$error>::ValidationError(reason),
                        other => <$error>::ActorCommunicationError(other.to_string()),
                    })
                }
            }
        }
    };
}

macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(inner: crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }
    };
}

macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        impl_client_new!($client_name, $entity);
        impl_client_methods!($client_name, inner: $entity, $error, $entity_name_snake);
    };
}
