use std::path::Path;
use sysinfo::Disks;

/// Free bytes on the volume that holds `path`, if any mounted disk contains it.
pub fn available_space(path: &Path) -> Option<u64> {
    let disks = Disks::new_with_refreshed_list();
    disks
        .list()
        .iter()
        .filter(|d| path.starts_with(d.mount_point()))
        .max_by_key(|d| d.mount_point().as_os_str().len())
        .map(sysinfo::Disk::available_space)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_has_no_volume() {
        assert_eq!(available_space(Path::new("relative/path")), None);
    }
}
