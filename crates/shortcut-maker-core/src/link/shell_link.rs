//! Windows shell links (.lnk) through the `IShellLinkW` COM object.
//!
//! `windows-sys` exposes the COM runtime functions but not the shell
//! interfaces, so the two vtables used here are declared by hand in their
//! documented slot order.
#![allow(unsafe_code, non_snake_case)]

use std::ffi::{c_void, OsStr, OsString};
use std::os::windows::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

use windows_sys::core::{GUID, HRESULT, PCWSTR, PWSTR};
use windows_sys::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_INPROC_SERVER,
    COINIT_APARTMENTTHREADED, STGM_READ,
};

use super::{LinkSpec, LinkWriter};
use crate::error::{Result, ShortcutError};
use tracing::debug;

const CLSID_SHELL_LINK: GUID = GUID::from_u128(0x00021401_0000_0000_c000_000000000046);
const IID_ISHELL_LINK_W: GUID = GUID::from_u128(0x000214f9_0000_0000_c000_000000000046);
const IID_IPERSIST_FILE: GUID = GUID::from_u128(0x0000010b_0000_0000_c000_000000000046);

const RPC_E_CHANGED_MODE: HRESULT = 0x8001_0106_u32 as HRESULT;

/// Large enough for extended-length paths.
const PATH_BUFFER_LEN: usize = 32_768;

type Slot = *const c_void;

#[repr(C)]
#[allow(dead_code)]
struct IUnknownVtbl {
    QueryInterface: unsafe extern "system" fn(*mut c_void, *const GUID, *mut *mut c_void) -> HRESULT,
    AddRef: unsafe extern "system" fn(*mut c_void) -> u32,
    Release: unsafe extern "system" fn(*mut c_void) -> u32,
}

#[repr(C)]
#[allow(dead_code)]
struct IShellLinkWVtbl {
    base: IUnknownVtbl,
    GetPath: unsafe extern "system" fn(*mut c_void, PWSTR, i32, *mut c_void, u32) -> HRESULT,
    GetIDList: Slot,
    SetIDList: Slot,
    GetDescription: Slot,
    SetDescription: unsafe extern "system" fn(*mut c_void, PCWSTR) -> HRESULT,
    GetWorkingDirectory: Slot,
    SetWorkingDirectory: unsafe extern "system" fn(*mut c_void, PCWSTR) -> HRESULT,
    GetArguments: Slot,
    SetArguments: Slot,
    GetHotkey: Slot,
    SetHotkey: Slot,
    GetShowCmd: Slot,
    SetShowCmd: unsafe extern "system" fn(*mut c_void, i32) -> HRESULT,
    GetIconLocation: Slot,
    SetIconLocation: unsafe extern "system" fn(*mut c_void, PCWSTR, i32) -> HRESULT,
    SetRelativePath: Slot,
    Resolve: Slot,
    SetPath: unsafe extern "system" fn(*mut c_void, PCWSTR) -> HRESULT,
}

#[repr(C)]
#[allow(dead_code)]
struct IPersistFileVtbl {
    base: IUnknownVtbl,
    GetClassID: Slot,
    IsDirty: Slot,
    Load: unsafe extern "system" fn(*mut c_void, PCWSTR, u32) -> HRESULT,
    Save: unsafe extern "system" fn(*mut c_void, PCWSTR, i32) -> HRESULT,
    SaveCompleted: Slot,
    GetCurFile: Slot,
}

/// Keeps COM initialised on this thread for as long as it lives.
struct ComApartment {
    owns_init: bool,
}

impl ComApartment {
    fn enter(link_path: &Path) -> Result<Self> {
        // SAFETY: the reserved pointer must be null; balanced by CoUninitialize in Drop.
        let hr = unsafe { CoInitializeEx(std::ptr::null(), COINIT_APARTMENTTHREADED as _) };
        if hr >= 0 {
            Ok(Self { owns_init: true })
        } else if hr == RPC_E_CHANGED_MODE {
            // Already initialised with another model; usable as is.
            Ok(Self { owns_init: false })
        } else {
            Err(com_error("Failed to initialise COM", hr, link_path))
        }
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.owns_init {
            // SAFETY: paired with the successful CoInitializeEx in `enter`.
            unsafe { CoUninitialize() };
        }
    }
}

/// An owned interface pointer, released on drop.
struct ComPtr<V> {
    raw: *mut c_void,
    _vtbl: std::marker::PhantomData<V>,
}

impl<V> ComPtr<V> {
    fn vtbl(&self) -> &V {
        // SAFETY: `raw` points at a live COM object whose first field is a
        // pointer to a vtable laid out as `V`.
        unsafe { &**(self.raw as *mut *const V) }
    }

    fn unknown(&self) -> &IUnknownVtbl {
        // SAFETY: every COM vtable starts with the IUnknown slots.
        unsafe { &**(self.raw as *mut *const IUnknownVtbl) }
    }
}

impl<V> Drop for ComPtr<V> {
    fn drop(&mut self) {
        // SAFETY: we own exactly one reference to `raw`.
        unsafe {
            (self.unknown().Release)(self.raw);
        }
    }
}

/// A shell link object plus its `IPersistFile` view.
struct ShellLink {
    link: ComPtr<IShellLinkWVtbl>,
    file: ComPtr<IPersistFileVtbl>,
}

impl ShellLink {
    fn create(link_path: &Path) -> Result<Self> {
        let mut raw_link: *mut c_void = std::ptr::null_mut();
        // SAFETY: GUID pointers reference statics; `raw_link` receives an
        // owned IShellLinkW pointer on success.
        let hr = unsafe {
            CoCreateInstance(
                &CLSID_SHELL_LINK,
                std::ptr::null_mut(),
                CLSCTX_INPROC_SERVER,
                &IID_ISHELL_LINK_W,
                &mut raw_link,
            )
        };
        check(hr, "Failed to create shell link object", link_path)?;
        let link = ComPtr::<IShellLinkWVtbl> {
            raw: raw_link,
            _vtbl: std::marker::PhantomData,
        };

        let mut raw_file: *mut c_void = std::ptr::null_mut();
        // SAFETY: `link.raw` is live; QueryInterface hands back an owned pointer.
        let hr = unsafe { (link.unknown().QueryInterface)(link.raw, &IID_IPERSIST_FILE, &mut raw_file) };
        check(hr, "Shell link does not support IPersistFile", link_path)?;
        let file = ComPtr::<IPersistFileVtbl> {
            raw: raw_file,
            _vtbl: std::marker::PhantomData,
        };

        Ok(Self { link, file })
    }
}

/// [`LinkWriter`] producing native Windows `.lnk` files.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellLinkWriter;

impl LinkWriter for ShellLinkWriter {
    fn create_or_overwrite(&self, path: &Path, spec: &LinkSpec) -> Result<()> {
        let _apartment = ComApartment::enter(path)?;
        let shell = ShellLink::create(path)?;
        let link = shell.link.vtbl();

        let target = to_wide(spec.target.as_os_str());
        // SAFETY: every string is NUL-terminated UTF-16 alive across its call.
        unsafe {
            check((link.SetPath)(shell.link.raw, target.as_ptr()), "Failed to set shortcut target", path)?;

            if let Some(ref dir) = spec.working_dir {
                let dir = to_wide(dir.as_os_str());
                check(
                    (link.SetWorkingDirectory)(shell.link.raw, dir.as_ptr()),
                    "Failed to set shortcut working directory",
                    path,
                )?;
            }

            if let Some(ref description) = spec.description {
                let description = to_wide(OsStr::new(description));
                check(
                    (link.SetDescription)(shell.link.raw, description.as_ptr()),
                    "Failed to set shortcut description",
                    path,
                )?;
            }

            if let Some(ref icon) = spec.icon {
                let icon = to_wide(icon.as_os_str());
                check(
                    (link.SetIconLocation)(shell.link.raw, icon.as_ptr(), 0),
                    "Failed to set shortcut icon",
                    path,
                )?;
            }

            check(
                (link.SetShowCmd)(shell.link.raw, spec.show_command.as_raw()),
                "Failed to set shortcut window style",
                path,
            )?;

            let file_name = to_wide(path.as_os_str());
            check(
                (shell.file.vtbl().Save)(shell.file.raw, file_name.as_ptr(), 1),
                "Failed to save shortcut",
                path,
            )?;
        }

        debug!("Saved shell link {:?} -> {:?}", path, spec.target);
        Ok(())
    }

    fn read_target(&self, path: &Path) -> Result<PathBuf> {
        let _apartment = ComApartment::enter(path)?;
        let shell = ShellLink::create(path)?;

        let file_name = to_wide(path.as_os_str());
        let mut buffer = vec![0u16; PATH_BUFFER_LEN];
        // SAFETY: `file_name` is NUL-terminated; `buffer` holds PATH_BUFFER_LEN
        // u16s and GetPath writes at most that many. Find data is optional.
        unsafe {
            check(
                (shell.file.vtbl().Load)(shell.file.raw, file_name.as_ptr(), STGM_READ),
                "Failed to load shortcut",
                path,
            )?;
            check(
                (shell.link.vtbl().GetPath)(
                    shell.link.raw,
                    buffer.as_mut_ptr(),
                    PATH_BUFFER_LEN as i32,
                    std::ptr::null_mut(),
                    0,
                ),
                "Failed to read shortcut target",
                path,
            )?;
        }

        let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
        Ok(PathBuf::from(OsString::from_wide(&buffer[..len])))
    }
}

fn to_wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

fn check(hr: HRESULT, message: &str, path: &Path) -> Result<()> {
    if hr >= 0 {
        Ok(())
    } else {
        Err(com_error(message, hr, path))
    }
}

fn com_error(message: &str, hr: HRESULT, path: &Path) -> ShortcutError {
    ShortcutError::Link {
        message: format!("{} (HRESULT 0x{:08X})", message, hr as u32),
        path: path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_read_back_target() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("report.txt");
        std::fs::write(&target, b"report").unwrap();
        let link = temp_dir.path().join("report.lnk");

        let spec = LinkSpec::builder(&target)
            .working_dir(temp_dir.path())
            .description("Report")
            .icon(&target)
            .build();

        ShellLinkWriter.create_or_overwrite(&link, &spec).unwrap();
        assert!(link.exists());

        let read = ShellLinkWriter.read_target(&link).unwrap();
        assert!(read
            .to_string_lossy()
            .eq_ignore_ascii_case(&target.to_string_lossy()));
    }

    #[test]
    fn test_read_target_of_missing_link_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = ShellLinkWriter
            .read_target(&temp_dir.path().join("missing.lnk"))
            .unwrap_err();
        assert!(matches!(err, ShortcutError::Link { .. }));
    }
}
