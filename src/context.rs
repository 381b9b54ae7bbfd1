use std::any::{Any, TypeId};

use crate::hashing::{HashMap, HashMapExt};

/// A type that owns a piece of simulation state held by the [`Context`].
///
/// Modules do not store state themselves; they define a plugin with
/// [`define_data_plugin!`] and access its container through
/// [`Context::get_data_container`] / [`Context::get_data_container_mut`].
pub trait DataPlugin: Any {
    type DataContainer;

    fn create_data_container() -> Self::DataContainer;
}

/// Defines a new data plugin type with the given container type and
/// default value for the container.
#[macro_export]
macro_rules! define_data_plugin {
    ($plugin:ident, $data_container:ty, $default: expr) => {
        struct $plugin;

        impl $crate::context::DataPlugin for $plugin {
            type DataContainer = $data_container;

            fn create_data_container() -> Self::DataContainer {
                $default
            }
        }
    };
}
pub use define_data_plugin;

/// The central object of a generator run. All simulation state (the
/// population, the venue pool, the infected set, rng streams, report
/// writers) lives in data plugins owned by the `Context`, and all of the
/// simulation-specific logic is provided by trait extensions that rely on
/// the `Context` for storage.
pub struct Context {
    data_plugins: HashMap<TypeId, Box<dyn Any>>,
}

impl Context {
    #[must_use]
    pub fn new() -> Context {
        Context {
            data_plugins: HashMap::new(),
        }
    }

    fn add_plugin<T: DataPlugin>(&mut self) {
        self.data_plugins
            .insert(TypeId::of::<T>(), Box::new(T::create_data_container()));
    }

    /// Gets a mutable reference to the data container associated with the
    /// given plugin, creating it with its default value if it does not
    /// exist yet.
    pub fn get_data_container_mut<T: DataPlugin>(&mut self, _plugin: T) -> &mut T::DataContainer {
        let type_id = &TypeId::of::<T>();
        if !self.data_plugins.contains_key(type_id) {
            self.add_plugin::<T>();
        }
        self.data_plugins
            .get_mut(type_id)
            .unwrap()
            .downcast_mut::<T::DataContainer>()
            // The container was created by add_plugin with the right type
            .unwrap()
    }

    /// Gets a reference to the data container associated with the given
    /// plugin, or `None` if the plugin has never been accessed mutably.
    pub fn get_data_container<T: DataPlugin>(&self, _plugin: T) -> Option<&T::DataContainer> {
        self.data_plugins
            .get(&TypeId::of::<T>())?
            .downcast_ref::<T::DataContainer>()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
