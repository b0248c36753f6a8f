pub mod boxsim_vis3d;
